//! HTTP client implementation for the Google Fit REST API.
//!
//! This module provides a reqwest-based implementation of the
//! [`GoogleFitClient`](crate::GoogleFitClient) trait.

use crate::auth::TokenProvider;
use crate::{Dataset, DayWindow, FitError, GoogleFitClient};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use std::sync::Arc;

/// Client for the Google Fit API using reqwest.
#[derive(Clone)]
pub struct ReqwestGoogleFitClient {
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
    client: reqwest::Client,
}

impl ReqwestGoogleFitClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Google Fit API (e.g., "https://fitness.googleapis.com")
    /// * `tokens` - The credential provider supplying bearer tokens
    pub fn new(base_url: &str, tokens: Arc<dyn TokenProvider>) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            client,
        }
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> FitError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => FitError::NotFound(body_snippet),
            401 | 403 => FitError::Auth(body_snippet),
            _ => FitError::Api {
                status,
                body_snippet,
            },
        }
    }
}

#[async_trait]
impl GoogleFitClient for ReqwestGoogleFitClient {
    async fn dataset(
        &self,
        data_source_id: &str,
        window: &DayWindow,
    ) -> Result<Dataset, FitError> {
        let token = self.tokens.access_token().await?;
        let url = format!(
            "{}/fitness/v1/users/me/dataSources/{}/datasets/{}",
            self.base_url,
            data_source_id,
            window.dataset_id()
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<Dataset>().await?)
    }
}
