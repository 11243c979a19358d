//! Builds the `redirect_url` that brings a user back to where they were after logging in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Only same-site paths are allowed, and never the log-in page itself.
fn is_safe_redirect_url(path_and_query: &str) -> bool {
    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return false;
    }

    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW
}

/// Reduce a user supplied URL to a safe local path and query, or `None` if it
/// points to another site or back to the log-in page.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;

    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    local_path_and_query(&uri)
}

fn local_path_and_query(uri: &Uri) -> Option<String> {
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// The log-in URL for a request that failed authentication.
///
/// Page requests come back to the requested URI. htmx requests to `/api` come back to
/// the page that issued them, taken from the `HX-Current-URL` header, which is a full
/// URL so its host is dropped.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let target = if request.uri().path().starts_with("/api") {
        let headers = request.headers();
        let is_hx_request = headers
            .get("hx-request")
            .and_then(|header| header.to_str().ok())
            .is_some_and(|header| header.eq_ignore_ascii_case("true"));

        if !is_hx_request {
            tracing::warn!("Missing HX-Request header for {}.", request.uri());
            return None;
        }

        let current_url = headers
            .get("hx-current-url")
            .and_then(|header| header.to_str().ok())?;

        current_url
            .parse::<Uri>()
            .ok()
            .as_ref()
            .and_then(local_path_and_query)?
    } else {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    };

    build_log_in_redirect_url_from_target(&target)
}

/// The log-in URL with `redirect_target` as the `redirect_url` query parameter.
pub fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::LOG_IN_VIEW, param)),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}
