//! Email and password authentication with an encrypted session cookie.
//!
//! This module contains:
//! - Users, password validation and hashing
//! - The session token, the cookie that carries it, and the middleware that checks it
//! - The log-in, log-out and registration pages and endpoints

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod token;
mod user;

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;
pub use cookie::{DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use redirect::normalize_redirect_url;
pub use register_user::{get_register_page, register_user};
pub use token::Token;
pub use user::{
    User, UserID, count_users, create_user, create_user_table, get_user_by_email, parse_email,
    update_password,
};
