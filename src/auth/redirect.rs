//! Where to send the user after they log in.
//!
//! The target travels through the `redirect_url` query parameter, so it is
//! only accepted when it is a path on this site that the user can come back
//! to. The log-in and registration pages and the `/api` routes are refused.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

fn is_safe_redirect_path(path_and_query: &str) -> bool {
    if !path_and_query.starts_with('/') || path_and_query.starts_with("//") {
        return false;
    }

    let path = path_and_query
        .split_once('?')
        .map_or(path_and_query, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW && path != endpoints::REGISTER_VIEW && !path.starts_with("/api")
}

/// The path and query of `raw_url` if it is a safe place to redirect to.
///
/// Absolute URLs are refused, even when they point at this site.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }

    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_path(path_and_query).then(|| path_and_query.to_owned())
}

/// Like [normalize_redirect_url], but `raw_url` is the absolute URL htmx sends
/// in the `HX-Current-URL` header.
fn normalize_hx_current_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_path(path_and_query).then(|| path_and_query.to_owned())
}

/// Parse a `redirect_url` the client sent, logging it if it is refused.
pub fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let raw_url = raw_url?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

/// The log-in page URL that brings the user back to the page `request` was for.
///
/// Page requests come back to their own URL. htmx requests to `/api` come
/// back to the page they were sent from. Falls back to the dashboard.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    let redirect_target = if request.uri().path().starts_with("/api") {
        redirect_target_from_hx_request(request)
    } else {
        request
            .uri()
            .path_and_query()
            .and_then(|path_and_query| normalize_redirect_url(path_and_query.as_str()))
    };

    let redirect_target = redirect_target.unwrap_or_else(|| {
        tracing::debug!(
            "No redirect target for {}, falling back to the dashboard.",
            request.uri()
        );
        endpoints::DASHBOARD_VIEW.to_owned()
    });

    build_log_in_redirect_url_from_target(&redirect_target)
}

fn build_log_in_redirect_url_from_target(redirect_target: &str) -> String {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => format!("{}?{}", endpoints::LOG_IN_VIEW, param),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let current_url = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())?;

    let redirect_url = normalize_hx_current_url(current_url);
    if redirect_url.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, extract::Request};

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    #[test]
    fn accepts_page_paths_with_query() {
        assert_eq!(
            normalize_redirect_url("/income?saved=1"),
            Some("/income?saved=1".to_owned())
        );
    }

    #[test]
    fn refuses_unsafe_targets() {
        for url in [
            "https://evil.example.com/dashboard",
            "//evil.example.com",
            "dashboard",
            "/log_in?redirect_url=/dashboard",
            "/register",
            "/api/transactions",
        ] {
            assert_eq!(normalize_redirect_url(url), None, "{url} should be refused");
        }
    }

    #[test]
    fn page_request_comes_back_to_itself() {
        let request = Request::get("/category").body(Body::empty()).unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            "/log_in?redirect_url=%2Fcategory"
        );
    }

    #[test]
    fn api_request_comes_back_to_current_page() {
        let request = Request::delete("/api/transactions/1")
            .header("HX-Request", "true")
            .header("HX-Current-URL", "http://localhost:3000/expense")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            "/log_in?redirect_url=%2Fexpense"
        );
    }

    #[test]
    fn api_request_without_htmx_falls_back_to_dashboard() {
        let request = Request::delete("/api/transactions/1")
            .body(Body::empty())
            .unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            "/log_in?redirect_url=%2Fdashboard"
        );
    }
}
