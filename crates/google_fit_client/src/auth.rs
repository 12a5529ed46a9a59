//! Credential provider for the Google Fit API.
//!
//! The session handle is an explicitly owned collaborator injected into the
//! HTTP client; aggregation code never touches tokens directly.

use crate::FitError;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    /// Return a currently valid access token, refreshing if needed.
    async fn access_token(&self) -> Result<SecretString, FitError>;
}

/// Fixed token, for tests and single-shot runs with a pre-minted credential.
pub struct StaticTokenProvider {
    token: SecretString,
}

impl StaticTokenProvider {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<SecretString, FitError> {
        Ok(self.token.clone())
    }
}

#[derive(Clone)]
struct CachedToken {
    token: SecretString,
    expires_at: DateTime<Utc>,
}

/// Refresh-token based provider. Caches the current access token and lazily
/// refreshes it against the OAuth token endpoint when it is about to expire.
pub struct OAuthTokenProvider {
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl OAuthTokenProvider {
    pub fn new(
        token_url: &str,
        client_id: impl Into<String>,
        client_secret: SecretString,
        refresh_token: SecretString,
    ) -> Self {
        Self {
            token_url: token_url.trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret,
            refresh_token,
            http: reqwest::Client::new(),
            cached: Mutex::new(None),
        }
    }

    pub fn from_config(cfg: &crate::config::Config) -> Self {
        Self::new(
            &cfg.token_url,
            cfg.client_id.clone(),
            cfg.client_secret.clone(),
            cfg.refresh_token.clone(),
        )
    }

    async fn refresh(&self) -> Result<CachedToken, FitError> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            #[serde(default = "default_expires_in")]
            expires_in: i64,
        }
        fn default_expires_in() -> i64 {
            3600
        }

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret()),
            ("refresh_token", self.refresh_token.expose_secret()),
        ];
        let resp = self.http.post(&self.token_url).form(&params).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.chars().take(256).collect();
            return Err(FitError::Auth(format!("token refresh {status}: {snippet}")));
        }
        let payload: TokenResponse = resp.json().await?;
        tracing::debug!("refreshed access token, valid {}s", payload.expires_in);
        Ok(CachedToken {
            token: SecretString::new(payload.access_token.into()),
            expires_at: Utc::now() + Duration::seconds(payload.expires_in),
        })
    }
}

#[async_trait]
impl TokenProvider for OAuthTokenProvider {
    async fn access_token(&self) -> Result<SecretString, FitError> {
        let mut cached = self.cached.lock().await;
        // 60s skew so a token never expires mid-request
        if let Some(c) = cached.as_ref()
            && c.expires_at - Utc::now() > Duration::seconds(60)
        {
            return Ok(c.token.clone());
        }
        let fresh = self.refresh().await?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }
}
