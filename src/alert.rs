//! Alerts for showing success and error messages after form submissions.
//!
//! Alerts are rendered into the `#alert-container` element of the base page,
//! either as the target of an htmx request or as an out-of-band swap.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

/// A message shown to the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message with extra details.
    Success {
        /// The headline of the alert.
        message: String,
        /// A longer explanation shown under the headline.
        details: String,
    },
    /// A success message without details.
    SuccessSimple {
        /// The headline of the alert.
        message: String,
    },
    /// An error message with extra details.
    Error {
        /// The headline of the alert.
        message: String,
        /// A longer explanation shown under the headline.
        details: String,
    },
    /// An error message without details.
    ErrorSimple {
        /// The headline of the alert.
        message: String,
    },
}

const SUCCESS_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded-lg \
    bg-green-50 dark:bg-gray-800 dark:text-green-400 border border-green-300 \
    dark:border-green-800 shadow";

const ERROR_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
    dark:bg-gray-800 dark:text-red-400 border border-red-300 dark:border-red-800 \
    shadow";

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, Some(details)),
            Alert::SuccessSimple { message } => (SUCCESS_STYLE, message, None),
            Alert::Error { message, details } => (ERROR_STYLE, message, Some(details)),
            Alert::ErrorSimple { message } => (ERROR_STYLE, message, None),
        };

        html! {
            div
                class=(style)
                role="alert"
                onclick="this.remove()"
            {
                p class="font-medium" { (message) }

                @if let Some(details) = details.filter(|details| !details.is_empty())
                {
                    p class="mt-1" { (details) }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn renders_message_and_details() {
        let markup = Alert::Error {
            message: "Gagal".to_owned(),
            details: "Nomor polisi wajib diisi".to_owned(),
        }
        .into_html();

        let fragment = Html::parse_fragment(&markup.into_string());
        let paragraphs: Vec<String> = fragment
            .select(&Selector::parse("p").unwrap())
            .map(|p| p.text().collect())
            .collect();

        assert_eq!(paragraphs, vec!["Gagal", "Nomor polisi wajib diisi"]);
    }

    #[test]
    fn simple_alert_has_no_details() {
        let markup = Alert::SuccessSimple {
            message: "Tersimpan".to_owned(),
        }
        .into_html();

        let fragment = Html::parse_fragment(&markup.into_string());
        let paragraph_count = fragment.select(&Selector::parse("p").unwrap()).count();

        assert_eq!(paragraph_count, 1);
    }
}
