//! Implements a struct that holds the state of the REST server.

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::DEFAULT_COOKIE_DURATION,
    config::{Backend, BackendConfig},
    identity::IdentityProvider,
    store::TransactionStore,
};

/// The state of the REST server.
#[derive(Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,

    /// Checks credentials and issues sessions.
    pub identity: Arc<dyn IdentityProvider>,

    /// Where the users' transactions are kept.
    pub store: Arc<dyn TransactionStore>,

    /// How long a transaction stays marked for removal before it is deleted.
    pub removal_delay: std::time::Duration,
}

impl AppState {
    /// Create a new [AppState] connected to the backend in `config`.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be set up.
    pub fn new(config: &BackendConfig, cookie_secret: &str) -> Result<Self, Error> {
        Ok(Self::from_backend(config.build()?, cookie_secret))
    }

    /// Create a new [AppState] from an already connected backend.
    pub fn from_backend((identity, store): Backend, cookie_secret: &str) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            identity,
            store,
            // The row fade is done in the browser by the htmx swap delay.
            removal_delay: std::time::Duration::ZERO,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
