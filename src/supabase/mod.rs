//! A client for a hosted Supabase project.
//!
//! [SupabaseClient] implements both [crate::IdentityProvider], through the
//! GoTrue auth API, and [crate::TransactionStore], through the PostgREST data
//! API.

mod auth;
mod rest;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use crate::config::SupabaseConfig;

/// Talks to the auth and REST APIs of a Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    client: reqwest::Client,
    url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Create a client for the project described by `config`.
    pub fn new(config: &SupabaseConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.trim_end_matches('/').to_owned(),
            anon_key: config.anon_key.clone(),
        }
    }

    /// Start a request to `path` on the project.
    ///
    /// The request is authorized with `access_token`, or with the anon key if
    /// there is no token.
    fn request(&self, method: Method, path: &str, access_token: Option<&str>) -> RequestBuilder {
        let token = access_token.unwrap_or(&self.anon_key);

        self.client
            .request(method, format!("{}{path}", self.url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
    }
}

/// A failed response from Supabase.
#[derive(Debug, Clone, PartialEq)]
struct ApiError {
    status: StatusCode,
    message: String,
}

/// Pass through successful responses, otherwise read the error message from
/// the response body.
async fn check_response(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    });

    tracing::error!("Supabase responded with {status}: {message}");

    Err(ApiError { status, message })
}

/// Get the first of the message fields Supabase uses from a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;

    ["msg", "message", "error_description", "error"]
        .into_iter()
        .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_owned))
}
