use std::sync::Arc;

use crate::bmr::Demographics;
use google_fit_client::GoogleFitClient;

/// Shared handler state: the provider client (with its owned credential
/// collaborator inside) and the configured demographics for BMR.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn GoogleFitClient>,
    pub demographics: Demographics,
}

impl AppState {
    pub fn new(client: Arc<dyn GoogleFitClient>, demographics: Demographics) -> Self {
        Self {
            client,
            demographics,
        }
    }
}
