//! The state shared by every request handler.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::DEFAULT_COOKIE_DURATION, db::initialize, timezone::get_local_offset};

/// The state of the web server.
///
/// Handlers do not take this directly. Each one declares a smaller state
/// struct with a [FromRef] impl that picks out the fields it needs.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Signs and encrypts the session cookie.
    pub cookie_key: Key,

    /// How long a session lasts without "remember me".
    pub cookie_duration: Duration,

    /// The canonical name of the dealership's timezone, e.g. "Asia/Jakarta".
    pub local_timezone: String,

    /// The bookkeeping database.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create the tables the app needs in `db_connection` and wrap it for
    /// sharing between requests.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a
    /// canonical timezone name, or an SQL error if the tables cannot be created.
    pub fn new(
        db_connection: Connection,
        cookie_secret: &str,
        local_timezone: &str,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        initialize(&db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Derive the cookie key from the SHA-512 digest of `secret`.
pub fn create_cookie_key(secret: &str) -> Key {
    Key::from(&Sha512::digest(secret))
}
