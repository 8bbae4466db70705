//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request was missing a field or a field had an invalid value.
    ///
    /// The string is shown to the client and should explain what to fix.
    #[error("{0}")]
    Validation(String),

    /// The email address is already used by another user.
    #[error("a user with this email already exists")]
    DuplicateEmail,

    /// The user already has a category with the same normalized name.
    #[error("a category with this name already exists")]
    DuplicateCategory,

    /// The email and password did not match a registered user.
    ///
    /// The same error is used for an unknown email and a wrong password so
    /// that clients cannot tell which one was wrong.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The request did not carry a valid bearer token.
    #[error("not authorized, please log in")]
    Unauthenticated,

    /// The resource exists but belongs to another user.
    #[error("you are not allowed to access this resource")]
    Forbidden,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a category that transactions still reference.
    #[error("the category is used by one or more transactions and cannot be deleted")]
    CategoryInUse,

    /// A transaction referred to a category name the user does not have.
    #[error("the category \"{0}\" does not exist")]
    CategoryNotFound(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The session token could not be signed.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The report could not be written as CSV.
    #[error("could not export report: {0}")]
    ExportError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl Error {
    /// The HTTP status code that the error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_)
            | Error::DuplicateEmail
            | Error::CategoryInUse
            | Error::CategoryNotFound(_) => StatusCode::BAD_REQUEST,
            Error::InvalidCredentials | Error::Unauthenticated => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::DuplicateCategory => StatusCode::CONFLICT,
            Error::HashingError(_)
            | Error::TokenCreation(_)
            | Error::DatabaseLockError
            | Error::ExportError(_)
            | Error::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
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
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category.name") =>
            {
                Error::DuplicateCategory
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let message = if status_code.is_server_error() {
            // Any errors that are not client errors are not intended to be shown to the client.
            tracing::error!("An unexpected error occurred: {}", self);
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status_code, Json(json!({ "message": message }))).into_response()
    }
}
