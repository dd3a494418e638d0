//! Implements a struct that holds the state of the server.

use std::time::Duration;

use crate::{Error, api::HttpTransactionsApi};

/// The state of the server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the transactions service, shared by every request.
    pub api: HttpTransactionsApi,
}

impl AppState {
    /// Create a new [AppState] for the transactions service at `api_url`.
    ///
    /// `request_timeout` limits each request to the service. If `None`, the
    /// HTTP client's default applies.
    ///
    /// # Errors
    /// Returns an error if `api_url` is not a valid base URL.
    pub fn new(api_url: &str, request_timeout: Option<Duration>) -> Result<Self, Error> {
        let api = HttpTransactionsApi::new(api_url, request_timeout)?;
        tracing::info!("Fetching transactions from {}", api.transactions_url());

        Ok(Self { api })
    }
}
