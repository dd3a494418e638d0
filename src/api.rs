//! The client for the remote transactions service.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::{Error, transaction::TransactionsResponse};

/// The path of the transactions listing, relative to the service's base URL.
pub const TRANSACTIONS_PATH: &str = "transactions";

/// Something that can fetch the transactions listing.
pub trait TransactionsApi: Send + Sync {
    /// Fetch every transaction and the account totals.
    fn get_transactions(
        &self,
    ) -> impl Future<Output = Result<TransactionsResponse, Error>> + Send;
}

/// Fetches transactions over HTTP.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpTransactionsApi {
    client: Client,
    transactions_url: Url,
}

impl HttpTransactionsApi {
    /// Create a client for the service at `base_url`, e.g.
    /// "http://localhost:3333".
    ///
    /// If `timeout` is `None` the transport's default applies.
    ///
    /// # Errors
    /// Returns [Error::InvalidBaseUrl] if `base_url` is not a valid URL, or
    /// [Error::Request] if the HTTP client could not be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, Error> {
        let transactions_url = transactions_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .inspect_err(|error| tracing::error!("could not build HTTP client: {error}"))
            .map_err(|error| Error::Request(error.to_string()))?;

        Ok(Self {
            client,
            transactions_url,
        })
    }

    /// The full URL that transactions are fetched from.
    pub fn transactions_url(&self) -> &Url {
        &self.transactions_url
    }
}

impl TransactionsApi for HttpTransactionsApi {
    async fn get_transactions(&self) -> Result<TransactionsResponse, Error> {
        tracing::debug!("GET {}", self.transactions_url);

        let response = self
            .client
            .get(self.transactions_url.clone())
            .send()
            .await
            .map_err(|error| Error::Request(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| Error::Request(error.to_string()))?;

        serde_json::from_slice(&body).map_err(|error| Error::Decode(error.to_string()))
    }
}

/// Resolve the transactions path against `base_url`, keeping any path the
/// base URL already has, e.g. "http://host/api" -> "http://host/api/transactions".
fn transactions_url(base_url: &str) -> Result<Url, Error> {
    let invalid = |error: &dyn std::fmt::Display| {
        Error::InvalidBaseUrl(format!("\"{base_url}\": {error}"))
    };

    let mut url = Url::parse(base_url).map_err(|error| invalid(&error))?;

    if url.cannot_be_a_base() {
        return Err(invalid(&"URL cannot be used as a base"));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    url.join(TRANSACTIONS_PATH).map_err(|error| invalid(&error))
}
