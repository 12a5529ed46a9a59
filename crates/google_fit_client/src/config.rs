use crate::FitError;
use secrecy::SecretString;

#[derive(Clone, Debug)]
pub struct Config {
    pub client_id: String,
    pub client_secret: SecretString,
    pub refresh_token: SecretString,
    pub base_url: String,
    pub token_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, FitError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FitError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let client_id = get("GOOGLE_FIT_CLIENT_ID")
            .ok_or_else(|| FitError::Config("GOOGLE_FIT_CLIENT_ID missing".into()))?;
        let client_secret = get("GOOGLE_FIT_CLIENT_SECRET")
            .ok_or_else(|| FitError::Config("GOOGLE_FIT_CLIENT_SECRET missing".into()))?;
        let refresh_token = get("GOOGLE_FIT_REFRESH_TOKEN")
            .ok_or_else(|| FitError::Config("GOOGLE_FIT_REFRESH_TOKEN missing".into()))?;
        let base_url =
            get("GOOGLE_FIT_BASE_URL").unwrap_or_else(|| "https://fitness.googleapis.com".into());
        let token_url = get("GOOGLE_FIT_TOKEN_URL")
            .unwrap_or_else(|| "https://oauth2.googleapis.com/token".into());
        Ok(Self {
            client_id,
            client_secret: SecretString::new(client_secret.into()),
            refresh_token: SecretString::new(refresh_token.into()),
            base_url,
            token_url,
        })
    }
}
