//! Reading and writing the encrypted session cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{
    Error,
    auth::{Token, UserID},
};

/// The name of the cookie holding the serialized [Token].
pub const COOKIE_TOKEN: &str = "token";

/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

fn build_token_cookie(token: &Token) -> Result<Cookie<'static>, Error> {
    let value = serde_json::to_string(token)?;

    Ok(Cookie::build((COOKIE_TOKEN, value))
        .expires(token.expires_at)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .path("/")
        .build())
}

/// Add a session cookie for `user_id` to `jar` that expires `duration` from now.
///
/// `local_offset` is only used to express the expiry in local time.
///
/// # Errors
///
/// Returns [Error::InvalidDateFormat] if the expiry overflows, or
/// [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let now = OffsetDateTime::now_utc().to_offset(local_offset);
    let token = Token::new(user_id, now, duration).ok_or_else(|| {
        Error::InvalidDateFormat(format!("{now} + {duration} overflows the expiry"))
    })?;

    Ok(jar.add(build_token_cookie(&token)?))
}

/// Get the session token from `jar`.
///
/// # Errors
///
/// Returns [Error::CookieMissing] if there is no session cookie,
/// [Error::JSONSerializationError] if the cookie does not hold a token, or
/// [Error::SessionExpired] if the token has expired.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token = serde_json::from_str(cookie.value_trimmed())?;

    if token.is_expired(OffsetDateTime::now_utc()) {
        return Err(Error::SessionExpired);
    }

    Ok(token)
}

/// Push the session expiry out to `duration` from now, unless it already expires later.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned. Errors are the same as
/// [get_token_from_cookies] and [set_auth_cookie].
pub fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let now = OffsetDateTime::now_utc().to_offset(local_offset);
    let extended = Token::new(token.user_id, now, duration).ok_or_else(|| {
        Error::InvalidDateFormat(format!("{now} + {duration} overflows the expiry"))
    })?;

    if extended.expires_at <= token.expires_at {
        return Ok(jar);
    }

    Ok(jar.add(build_token_cookie(&extended)?))
}

/// Overwrite the session cookie with an expired placeholder so the browser drops it.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .path("/"),
    )
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::{
        Error,
        auth::{
            UserID,
            cookie::{
                COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
                get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
            },
        },
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"rahasia-dealer");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    fn jakarta() -> UtcOffset {
        UtcOffset::from_hms(7, 0, 0).unwrap()
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn set_cookie_stores_token() {
        let jar = set_auth_cookie(get_jar(), UserID::new(9), DEFAULT_COOKIE_DURATION, jakarta())
            .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();

        assert_eq!(token.user_id, UserID::new(9));
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION,
        );
        let cookie = jar.get(COOKIE_TOKEN).unwrap();
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(
            get_token_from_cookies(&get_jar()),
            Err(Error::CookieMissing)
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(-1), jakarta())
            .unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::SessionExpired));
    }

    #[test]
    fn garbage_cookie_is_rejected() {
        let jar = get_jar().add(Cookie::new(COOKIE_TOKEN, "FOOBAR"));

        assert!(matches!(
            get_token_from_cookies(&jar),
            Err(Error::JSONSerializationError(_))
        ));
    }

    #[test]
    fn extend_moves_expiry_forward() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::seconds(5), jakarta())
            .unwrap();

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10), jakarta()).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(10),
        );
    }

    #[test]
    fn extend_keeps_later_expiry() {
        let jar =
            set_auth_cookie(get_jar(), UserID::new(1), Duration::days(7), jakarta()).unwrap();
        let want = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), jakarta()).unwrap();

        assert_eq!(get_token_from_cookies(&jar).unwrap().expires_at, want);
    }

    #[test]
    fn invalidated_cookie_cannot_be_read() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION, jakarta())
            .unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert!(get_token_from_cookies(&jar).is_err());
    }
}
