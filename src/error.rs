//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert, auth::UserID, internal_server_error::InternalServerError,
    not_found::NotFoundError, transaction::FormError,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an email and password combination that does not match
    /// a registered user.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The session token cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar")]
    CookieMissing,

    /// The session token in the cookie has expired.
    #[error("the session has expired")]
    SessionExpired,

    /// There was an error formatting or computing the session expiry.
    #[error("could not compute the session expiry: {0}")]
    InvalidDateFormat(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The string could not be parsed as an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address is already registered to another user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// A company with the same name already exists.
    #[error("a company with that name already exists")]
    DuplicateCompanyName,

    /// A company name was empty.
    #[error("company name cannot be empty")]
    EmptyCompanyName,

    /// A role string read from the database is not one of the known roles.
    #[error("\"{0}\" is not a valid role")]
    InvalidRole(String),

    /// The user does not have a profile, so their role cannot be resolved.
    #[error("user {0} has no profile")]
    MissingProfile(UserID),

    /// The user is not a member of any company.
    #[error("user {0} does not belong to a company")]
    MissingCompany(UserID),

    /// The user's role does not allow the requested page or operation.
    #[error("the current user is not allowed to do that")]
    Forbidden,

    /// The transaction form failed validation.
    #[error("{0}")]
    InvalidForm(#[from] FormError),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not (de)serialize JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a transaction that does not exist or is not visible to the user.
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist or is not visible to the user.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// A spreadsheet, PDF or CSV document could not be generated.
    #[error("could not generate the {0} export: {1}")]
    ExportError(&'static str, String),

    /// A snapshot file could not be read or written.
    #[error("snapshot error: {0}")]
    SnapshotError(String),
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
                if sql_error.extended_code == 2067 && desc.ends_with("company.name") =>
            {
                Error::DuplicateCompanyName
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::Forbidden => NotFoundError.into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::MissingProfile(_) | Error::MissingCompany(_) => InternalServerError {
                description: "Account Not Set Up",
                fix: "Your account has no role or company yet. Ask an administrator to fix it.",
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
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
            Error::InvalidForm(error) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Transaksi tidak valid".to_owned(),
                    details: error.to_string(),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                },
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted."
                        .to_owned(),
                },
            ),
            Error::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate Email".to_owned(),
                    details: "That email address is already registered.".to_owned(),
                },
            ),
            Error::InvalidEmail(email) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid Email".to_owned(),
                    details: format!("\"{email}\" is not a valid email address."),
                },
            ),
            Error::TooWeak(feedback) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Password Too Weak".to_owned(),
                    details: feedback,
                },
            ),
            Error::Forbidden => (
                StatusCode::FORBIDDEN,
                Alert::ErrorSimple {
                    message: "You are not allowed to do that.".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: format!("{error}. Check the server logs for more details."),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
