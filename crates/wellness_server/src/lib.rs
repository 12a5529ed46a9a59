//! Wearables data server: aggregates a user's daily wellness metrics from
//! Google Fit into one JSON report, substituting plausible synthetic values
//! where the provider has nothing for the day.

pub mod aggregate;
pub mod bmr;
pub mod fallback;
pub mod report;
pub mod routes;
pub mod state;
pub mod window;
