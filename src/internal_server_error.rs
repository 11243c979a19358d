//! The page to display for an internal server error.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Describes what went wrong and how the user might fix it.
pub struct InternalServerError<'a> {
    /// What went wrong.
    pub description: &'a str,
    /// What the user can do about it.
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Maaf, terjadi kesalahan.",
            fix: "Coba lagi nanti atau periksa log server.",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(
                error_view("Internal Server Error", "500", self.description, self.fix)
                    .into_string(),
            ),
        )
            .into_response()
    }
}

/// Handler for the generic error page that other routes redirect to.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
