//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level cookie logic.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{
        REMEMBER_ME_COOKIE_DURATION, invalidate_auth_cookie, parse_redirect_url, set_auth_cookie,
    },
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, base_with_alert, email_input, loading_spinner,
        log_in_register, password_input,
    },
    identity::IdentityProvider,
};

/// Shown under the password field when the email and password do not match.
pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "อีเมลหรือรหัสผ่านไม่ถูกต้อง";

/// Shown on the log-in page after a successful registration.
pub const REGISTERED_MESSAGE: &str = "สมัครสมาชิกสำเร็จ! กรุณาเช็คอีเมลเพื่อยืนยัน";

fn log_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (email_input(email, None))
            (password_input("password", "รหัสผ่าน", "", 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label for="remember_me" class="block text-sm text-gray-300"
                {
                    "จดจำฉันไว้ 7 วัน"
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "เข้าสู่ระบบ"
            }

            p class="text-sm text-gray-400"
            {
                "ยังไม่มีบัญชี? "

                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "สมัครสมาชิก"
                }
            }
        }
    }
}

/// The query parameters the log-in page accepts.
#[derive(Deserialize)]
pub struct LogInQuery {
    /// Where to go after logging in.
    pub redirect_url: Option<String>,
    /// Set after registering to show a success message.
    pub registered: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<LogInQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_register("เข้าสู่ระบบ", &log_in_form);
    let alert = query.registered.map(|_| Alert::SuccessSimple {
        message: REGISTERED_MESSAGE.to_owned(),
    });

    base_with_alert("เข้าสู่ระบบ", &[], &content, alert).into_response()
}

/// The state needed to perform a login.
#[derive(Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// Checks the email and password.
    pub identity: Arc<dyn IdentityProvider>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            identity: state.identity.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie set and the client is redirected to the
/// dashboard page or `redirect_url`. Otherwise, the form is returned with an error message
/// explaining the problem.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let email = user_data.email.trim();

    let session = match state
        .identity
        .sign_in_with_password(email, &user_data.password)
        .await
    {
        Ok(session) => session,
        Err(Error::InvalidCredentials) => {
            return log_in_form(email, Some(INVALID_CREDENTIALS_ERROR_MSG), redirect_url)
                .into_response();
        }
        Err(Error::Auth(message)) => {
            return log_in_form(email, Some(&message), redirect_url).into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(
                email,
                Some("เกิดข้อผิดพลาดภายในระบบ กรุณาลองใหม่อีกครั้ง"),
                redirect_url,
            )
            .into_response();
        }
    };

    tracing::info!("User {} logged in", session.user.id);

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };
    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    set_auth_cookie(jar.clone(), &session.access_token, cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    pub email: String,

    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}
