//! Log-out route handler that ends the session, invalidates the auth cookie and redirects users.

use std::sync::Arc;

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};

use crate::{
    AppState,
    auth::{cookie::get_token_from_cookies, invalidate_auth_cookie},
    endpoints,
    identity::{IdentityProvider, Session},
};

/// The state needed to log a user out.
#[derive(Clone)]
pub struct LogOutState {
    pub cookie_key: Key,
    pub identity: Arc<dyn IdentityProvider>,
}

impl FromRef<AppState> for LogOutState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            identity: state.identity.clone(),
        }
    }
}

impl FromRef<LogOutState> for Key {
    fn from_ref(state: &LogOutState) -> Self {
        state.cookie_key.clone()
    }
}

/// Sign out with the identity provider, invalidate the auth cookie and redirect the client to
/// the log-in page.
///
/// The cookie is invalidated even if the identity provider could not be reached.
pub async fn get_log_out(State(state): State<LogOutState>, jar: PrivateCookieJar) -> Response {
    if let Ok(token) = get_token_from_cookies(&jar) {
        let signed_out = match state.identity.get_user(&token.access_token).await {
            Ok(user) => {
                let session = Session {
                    access_token: token.access_token,
                    expires_at: token.expires_at,
                    user,
                };
                state.identity.sign_out(&session).await
            }
            Err(error) => Err(error),
        };

        if let Err(error) = signed_out {
            tracing::warn!("Could not sign out with the identity provider: {error}");
        }
    }

    let jar = invalidate_auth_cookie(jar);

    (jar, Redirect::to(endpoints::LOG_IN_VIEW)).into_response()
}
