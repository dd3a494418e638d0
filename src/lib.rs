//! GoFinances is a dashboard for the transactions and balance of a GoFinances
//! account.
//!
//! The dashboard fetches the transactions listing from the GoFinances service,
//! formats the amounts and dates for display and serves the result as an HTML
//! page.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::response::{IntoResponse, Response};
use axum_server::Handle;
use tokio::signal;

mod api;
mod app_state;
mod currency;
mod dashboard;
mod endpoints;
mod error_pages;
mod html;
mod loader;
mod logging;
mod navigation;
mod routing;
mod timestamp;
mod transaction;
mod view_state;

#[cfg(test)]
mod test_utils;

pub use api::{HttpTransactionsApi, TransactionsApi};
pub use app_state::AppState;
pub use currency::{CURRENCY_PREFIX, format_currency, format_value};
pub use loader::{
    DashboardLoader, LoadState, Teardown, TeardownToken, ViewStateHolder, teardown_channel,
};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timestamp::Timestamp;
pub use transaction::{
    BalanceField, RawBalance, RawCategory, RawTransaction, TransactionType, TransactionsResponse,
};
pub use view_state::{
    DisplayBalance, DisplayCategory, DisplayTransaction, ViewState, format_signed_value, transform,
};

use crate::error_pages::InternalServerError;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// A balance amount from the transactions service is not a number.
    ///
    /// `field` is one of "income", "outcome" or "total" and `value` is the
    /// text that was received.
    #[error("the balance field \"{field}\" is not a number: {value:?}")]
    InvalidBalanceField {
        /// The name of the balance field.
        field: &'static str,
        /// The text that could not be parsed.
        value: String,
    },

    /// A transaction timestamp is not a date or date-time.
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    /// The request to the transactions service could not be completed.
    ///
    /// The string is the underlying transport error, for logging only.
    #[error("request to the transactions service failed: {0}")]
    Request(String),

    /// The transactions service answered with a non-success status code.
    #[error("the transactions service responded with status {0}")]
    UnexpectedStatus(u16),

    /// The transactions service's response did not have the expected shape.
    #[error("could not decode the transactions response: {0}")]
    Decode(String),

    /// The configured base URL of the transactions service is not usable.
    #[error("invalid transactions service URL {0}")]
    InvalidBaseUrl(String),

    /// A view tried to load its data a second time.
    #[error("the dashboard has already been loaded")]
    AlreadyLoaded,

    /// The view was torn down before its data arrived.
    #[error("the view was torn down before its data arrived")]
    TornDown,

    /// Could not acquire the view state lock.
    #[error("could not acquire the view state lock")]
    ViewStateLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::InvalidBaseUrl(url) => InternalServerError {
                description: "Invalid Server Settings",
                fix: &format!(
                    "The transactions service URL {url} is not valid. Check your server settings."
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}
