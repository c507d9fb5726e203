//! Middleware for logging requests and responses.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{Method, StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Form fields whose values never appear in the logs.
const REDACTED_FIELDS: [&str; 2] = ["password", "confirm_password"];

const REDACTED_VALUE: &str = "********";

/// Bodies longer than this many characters are truncated in the `info` log.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] characters, it is
/// truncated and the full body is logged at the `debug` level.
/// Passwords in submitted forms are redacted.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let body = match buffer_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let body_text = String::from_utf8_lossy(&body);
    let display_text = if parts.method == Method::POST && is_form(&parts.headers) {
        redact_passwords(&body_text)
    } else {
        body_text.into_owned()
    };
    log_body(
        &format!("Received request: {} {}", parts.method, parts.uri),
        &display_text,
    );

    let response = next.run(Request::from_parts(parts, Body::from(body))).await;

    let (parts, body) = response.into_parts();
    let body = match buffer_body(body).await {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    log_body(
        &format!("Sending response: {}", parts.status),
        &String::from_utf8_lossy(&body),
    );
    tracing::debug!("Response headers: {:#?}", parts.headers);

    Response::from_parts(parts, Body::from(body))
}

async fn buffer_body(body: Body) -> Result<Bytes, axum::Error> {
    axum::body::to_bytes(body, usize::MAX).await
}

fn is_form(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"))
}

/// Replace the values of password fields in a URL encoded form.
///
/// A body that is not a valid form is replaced entirely.
fn redact_passwords(form_text: &str) -> String {
    let Ok(fields) = serde_urlencoded::from_str::<Vec<(String, String)>>(form_text) else {
        return REDACTED_VALUE.to_owned();
    };

    let fields: Vec<(String, String)> = fields
        .into_iter()
        .map(|(name, value)| {
            if REDACTED_FIELDS.contains(&name.as_str()) {
                (name, REDACTED_VALUE.to_owned())
            } else {
                (name, value)
            }
        })
        .collect();

    serde_urlencoded::to_string(&fields).unwrap_or_else(|_| REDACTED_VALUE.to_owned())
}

/// The first [LOG_BODY_LENGTH_LIMIT] characters of `body`, or `None` if the
/// body is short enough to log whole.
fn truncate(body: &str) -> Option<&str> {
    body.char_indices()
        .nth(LOG_BODY_LENGTH_LIMIT)
        .map(|(end, _)| &body[..end])
}

fn log_body(message: &str, body: &str) {
    match truncate(body) {
        Some(prefix) => {
            tracing::info!("{message}\nbody: {prefix}...");
            tracing::debug!("Full body: {body:?}");
        }
        None => tracing::info!("{message}\nbody: {body:?}"),
    }
}
