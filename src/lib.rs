//! Finhub is a personal-finance bookkeeping backend.
//!
//! This library provides a JSON REST API for managing transactions,
//! categories, savings goals and generic goals, along with derived reports
//! (monthly/category totals and dashboard summaries). Every resource belongs
//! to the user that created it; categories may additionally be shared across
//! all users.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

pub mod auth;
pub mod db;
pub mod models;
pub mod ownership;
pub mod routes;
pub mod services;
pub mod state;
pub mod stores;

pub use auth::{AuthKeys, decode_token, encode_token};
pub use db::initialize as initialize_db;
pub use models::{
    Category, CategoryName, DatabaseID, Goal, NewCategory, NewGoal, NewSavingGoal, NewUser,
    Recurrence, SavingGoal, Transaction, TransactionBuilder, TransactionType, User, UserID,
};
pub use ownership::Ownership;
pub use routes::build_router;
pub use state::AppState;
pub use stores::{
    CategoryStore, GoalStore, SavingGoalStore, TransactionFilters, TransactionStore, UserStore,
    sqlite::{
        SQLiteCategoryStore, SQLiteGoalStore, SQLiteSavingGoalStore, SQLiteTransactionStore,
        SQLiteUserStore,
    },
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
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
///
/// Except for [Error::Sql], [Error::Hashing] and [Error::DatabaseLock],
/// every variant is a recoverable, caller-facing condition that maps to a
/// stable HTTP status.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The caller's input violates a required or numeric constraint.
    #[error("{0}")]
    Validation(String),

    /// The referenced resource does not exist.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The resource exists but belongs to another user and is not shared.
    #[error("access to this resource is denied")]
    Forbidden,

    /// A uniqueness constraint was violated, e.g. a duplicate category name
    /// or email address.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// The login credentials did not match a registered user.
    ///
    /// An unknown email and a wrong password produce the same error so that
    /// registered addresses cannot be enumerated.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// A withdrawal was larger than the savings goal's current amount.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The capability is declared but not built.
    #[error("this feature is not implemented")]
    NotImplemented,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// never sent to the client.
    #[error("hashing failed: {0}")]
    Hashing(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    Sql(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::AlreadyExists("email".to_string())
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 2067 =>
            {
                Error::AlreadyExists("resource".to_string())
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::Validation("a referenced id does not exist".to_string())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::Sql(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            Error::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Error::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            Error::AlreadyExists(_) => (StatusCode::CONFLICT, self.to_string()),
            Error::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Error::InsufficientFunds => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::NotImplemented => (StatusCode::NOT_IMPLEMENTED, self.to_string()),
            // Internal failures are logged server-side and reported opaquely.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn validation_error_maps_to_bad_request() {
        let response =
            Error::Validation("amount must be greater than zero".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn forbidden_is_distinct_from_not_found() {
        let forbidden = Error::Forbidden.into_response();
        let not_found = Error::NotFound.into_response();

        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn already_exists_maps_to_conflict() {
        let response = Error::AlreadyExists("category".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn sql_error_is_reported_opaquely() {
        let response = Error::Sql(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn no_rows_becomes_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }
}
