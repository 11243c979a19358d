//! The registration page where a dealer creates an account and their company.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{PasswordHash, ValidatedPassword, parse_email, set_auth_cookie},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base, email_input, link,
        loading_spinner, log_in_register, password_input,
    },
    tenant::register_account,
    timezone::get_local_offset,
};

/// The minimum number of characters the password should have to be considered valid on the client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

/// The values and per-field error messages of the registration form.
#[derive(Debug, Default)]
struct RegistrationFormView<'a> {
    email: &'a str,
    company_name: &'a str,
    email_error: Option<&'a str>,
    password_error: Option<&'a str>,
    confirm_password_error: Option<&'a str>,
    company_name_error: Option<&'a str>,
}

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Konfirmasi Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn company_name_input(company_name: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="company_name"
                class=(FORM_LABEL_STYLE)
            {
                "Nama Perusahaan"
            }

            input
                type="text"
                name="company_name"
                id="company_name"
                placeholder="Jaya Motor"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(company_name);

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

fn registration_form(view: &RegistrationFormView) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(view.email, view.email_error))
            (password_input("", PASSWORD_INPUT_MIN_LENGTH, view.password_error))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, view.confirm_password_error))
            (company_name_input(view.company_name, view.company_name_error))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Daftar"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Sudah punya akun? "
                (link(endpoints::LOG_IN_VIEW, "Masuk di sini"))
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form(&RegistrationFormView::default());
    let content = log_in_register("Buat akun dealer", &registration_form);
    base("Daftar", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
    /// The database connection for creating the account.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered in the registration form.
#[derive(Deserialize)]
pub struct RegisterForm {
    /// The email to log in with.
    pub email: String,
    /// The new password.
    pub password: String,
    /// The new password, typed again.
    pub confirm_password: String,
    /// The name of the dealer's company.
    pub company_name: String,
}

/// Create an account and its company, log the new user in and redirect to the
/// transactions page. Validation problems are shown next to the offending field.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let mut view = RegistrationFormView {
        email: &user_data.email,
        company_name: &user_data.company_name,
        ..Default::default()
    };

    let email = match parse_email(&user_data.email) {
        Ok(email) => email,
        Err(_) => {
            view.email_error = Some("Alamat email tidak valid");
            return registration_form(&view).into_response();
        }
    };

    if user_data.company_name.trim().is_empty() {
        view.company_name_error = Some("Nama perusahaan wajib diisi");
        return registration_form(&view).into_response();
    }

    let user_inputs = [email.as_str(), user_data.company_name.as_str()];
    let validated_password = match ValidatedPassword::new(&user_data.password, &user_inputs) {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            return registration_form(&RegistrationFormView {
                password_error: Some(&message),
                ..view
            })
            .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        view.confirm_password_error = Some("Password tidak sama");
        return registration_form(&view).into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return error.into_alert_response();
        }
    };

    let Some(local_timezone) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => register_account(
            email,
            password_hash,
            &user_data.company_name,
            &connection,
        ),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    let viewer = match result {
        Ok(viewer) => viewer,
        Err(Error::DuplicateEmail) => {
            view.email_error = Some("Email ini sudah terdaftar");
            return registration_form(&view).into_response();
        }
        Err(Error::DuplicateCompanyName) => {
            view.company_name_error = Some("Nama perusahaan sudah dipakai");
            return registration_form(&view).into_response();
        }
        Err(error) => {
            tracing::error!("An unhandled error occurred while registering a user: {error}");
            return error.into_alert_response();
        }
    };

    match set_auth_cookie(jar, viewer.user_id, state.cookie_duration, local_timezone) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An error occurred while setting the auth cookie: {error}");
            error.into_alert_response()
        }
    }
}
