//! A sales dashboard over a collection of product-sale records.
//!
//! This library provides a JSON API with aggregation endpoints (paginated
//! listing, search, statistics, price histogram and category breakdown) and a
//! server-rendered dashboard page built on top of the same queries.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde::Serialize;
use tokio::signal;

mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod logging;
mod month;
mod pagination;
mod report;
mod routing;
mod sale;

pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use month::MonthFilter;
pub use pagination::PaginationConfig;
pub use report::{
    CategoryCount, CombinedReport, PriceRangeCount, Statistics, get_category_counts,
    get_combined_report, get_price_ranges, get_statistics,
};
pub use routing::{RouterConfig, build_router};
pub use sale::{
    DEFAULT_SEED_URL, Sale, SaleFilter, SalePage, SeedSource, count_sales, fetch_seed_records,
    get_sales, get_sales_page, insert_sales, seed_from_external_source,
};

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
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A query parameter that the endpoint requires was not given.
    #[error("missing required query parameter \"{0}\"")]
    MissingParameter(&'static str),

    /// A query parameter was given but could not be interpreted.
    #[error("invalid value {value:?} for query parameter \"{name}\": {reason}")]
    InvalidParameter {
        /// The name of the query parameter.
        name: &'static str,
        /// The raw value from the request.
        value: String,
        /// What the parameter is expected to look like.
        reason: &'static str,
    },

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The external seed dataset could not be downloaded or decoded.
    ///
    /// Holds the display string of the underlying HTTP or decoding error.
    #[error("could not fetch seed data: {0}")]
    SeedFetchError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::SeedFetchError(value.to_string())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    error: String,
}

impl Error {
    /// The HTTP status code that best describes the error to a client.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingParameter(_) | Error::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::SqlError(_) | Error::DatabaseLockError | Error::SeedFetchError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Convert the error into a JSON response of the form `{message, error}`.
    ///
    /// `message` should name the operation that failed, e.g. "Error fetching statistics".
    pub fn into_json_response(self, message: &str) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("{message}: {self}");
        } else {
            tracing::debug!("{message}: {self}");
        }

        (
            status,
            Json(ErrorBody {
                message,
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match self {
            Error::MissingParameter(_) | Error::InvalidParameter { .. } => "Invalid request",
            Error::NotFound => "Not found",
            _ => "Something went wrong",
        };

        self.into_json_response(message)
    }
}
