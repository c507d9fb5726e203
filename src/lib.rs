//! CSMJU Finance is a web app for keeping track of personal income and expenses.
//!
//! This library provides a REST API that directly serves HTML pages. Users and
//! transactions live behind two boundaries, an [IdentityProvider] and a
//! [TransactionStore], with implementations backed by a local SQLite database
//! or a hosted Supabase project.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod auth;
mod category;
mod category_page;
mod config;
mod dashboard;
mod db;
mod endpoints;
mod html;
mod identity;
mod internal_server_error;
mod ledger_page;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod store;
mod supabase;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::{BackendConfig, SupabaseConfig, sqlite_backend};
pub use db::initialize as initialize_db;
pub use identity::{
    IdentityProvider, PasswordHash, SQLiteIdentityProvider, Session, User, UserId,
    ValidatedPassword,
};
pub use logging::logging_middleware;
pub use routing::build_router;
pub use store::{SQLiteTransactionStore, SortOrder, TransactionFilter, TransactionStore};
pub use supabase::SupabaseClient;
pub use transaction::{Amount, NewTransaction, Transaction, TransactionType};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

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

/// The message shown when a required transaction field is left blank.
pub const MISSING_FIELDS_MESSAGE: &str = "กรุณากรอกข้อมูลให้ครบ";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The email and password do not match a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request has no session, or the session has expired.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The identity provider rejected a request and explained why.
    #[error("{0}")]
    Auth(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email address is not a valid address.
    #[error("invalid email address")]
    InvalidEmail,

    /// A user with the email address is already registered.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// One of amount, date or category was left blank.
    #[error("กรุณากรอกข้อมูลให้ครบ")]
    MissingFields,

    /// The amount is not a non-negative number with at most two decimal places.
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    /// The date is not a calendar date in the format YYYY-MM-DD.
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),

    /// The data store rejected a request and explained why.
    #[error("{0}")]
    Store(String),

    /// A request to a remote backend could not be completed.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("user.email") =>
            {
                Error::DuplicateEmail
            }
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
        tracing::error!("HTTP request failed: {value}");
        Error::Http(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            Error::Http(_) => InternalServerError {
                description: "ไม่สามารถเชื่อมต่อฐานข้อมูลได้",
                fix: "ลองใหม่อีกครั้งในภายหลัง",
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

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::MissingFields => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: MISSING_FIELDS_MESSAGE.to_owned(),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "จำนวนเงินไม่ถูกต้อง".to_owned(),
                    details: format!(
                        "\"{amount}\" ต้องเป็นตัวเลขที่ไม่ติดลบ และมีทศนิยมไม่เกินสองตำแหน่ง"
                    ),
                },
            ),
            Error::InvalidDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "วันที่ไม่ถูกต้อง".to_owned(),
                    details: format!("\"{date}\" ต้องอยู่ในรูปแบบ YYYY-MM-DD"),
                },
            ),
            Error::Store(message) | Error::Auth(message) => (
                StatusCode::BAD_GATEWAY,
                Alert::ErrorSimple {
                    message: format!("❌ Error: {message}"),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "เกิดข้อผิดพลาด".to_owned(),
                        details: "เกิดข้อผิดพลาดที่ไม่คาดคิด ตรวจสอบ log ของเซิร์ฟเวอร์".to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
