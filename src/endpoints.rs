//! The URIs of the pages and API endpoints.
//!
//! For endpoints that take a parameter, e.g., '/transaksi/{transaction_id}/edit', use [format_endpoint].

/// The root route which redirects to the transaction page.
pub const ROOT: &str = "/";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The page with the transaction form, summary and table.
pub const TRANSACTIONS_VIEW: &str = "/transaksi";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transaksi/{transaction_id}/edit";
/// The page for managing the members of a company.
pub const MEMBERS_VIEW: &str = "/members";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route for registering a new account.
pub const USERS: &str = "/api/users";
/// The route for adding a member to the viewer's company.
pub const MEMBERS_API: &str = "/api/members";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transaksi";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transaksi/{transaction_id}";
/// The route to download the visible transactions as a spreadsheet.
pub const EXPORT_XLSX: &str = "/api/export/xlsx";
/// The route to download the visible transactions as a PDF.
pub const EXPORT_PDF: &str = "/api/export/pdf";
/// The route to download the visible transactions as CSV.
pub const EXPORT_CSV: &str = "/api/export/csv";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
