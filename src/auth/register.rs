//! The registration page and the endpoint that signs up new users.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, LINK_STYLE, base, email_input, loading_spinner, log_in_register,
        password_input,
    },
    identity::IdentityProvider,
    internal_server_error::get_internal_server_error_redirect,
};

/// The minimum number of characters the password should have to be considered valid on the client side (server-side validation is done on top of this validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

pub const PASSWORD_MISMATCH_ERROR_MSG: &str = "รหัสผ่านไม่ตรงกัน";

/// The error messages to show under each field of the registration form.
#[derive(Default)]
struct FieldErrors<'a> {
    email: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn registration_form(email: &str, errors: FieldErrors<'_>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #confirm_password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (email_input(email, errors.email))
            (password_input("password", "รหัสผ่าน", "", PASSWORD_INPUT_MIN_LENGTH, errors.password))
            (password_input(
                "confirm_password",
                "ยืนยันรหัสผ่าน",
                "",
                PASSWORD_INPUT_MIN_LENGTH,
                errors.confirm_password,
            ))

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "สมัครสมาชิก"
            }

            p class="text-sm text-gray-400"
            {
                "มีบัญชีอยู่แล้ว? "

                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                    "เข้าสู่ระบบ"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", FieldErrors::default());
    let content = log_in_register("สมัครสมาชิก", &registration_form);
    base("สมัครสมาชิก", &[], &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Clone)]
pub struct RegistrationState {
    pub identity: Arc<dyn IdentityProvider>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            identity: state.identity.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Sign up a new user and send them to the log-in page.
///
/// Users always log in after registering, even when the identity provider
/// starts a session straight away, since some providers first ask the user to
/// confirm their email.
pub async fn register_user(
    State(state): State<RegistrationState>,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    let email = user_data.email.trim();

    if user_data.password != user_data.confirm_password {
        let errors = FieldErrors {
            confirm_password: Some(PASSWORD_MISMATCH_ERROR_MSG),
            ..Default::default()
        };
        return registration_form(email, errors).into_response();
    }

    let error = match state.identity.sign_up(email, &user_data.password).await {
        Ok(_) => {
            tracing::info!("Registered a new user");
            return (
                HxRedirect(format!("{}?registered=1", endpoints::LOG_IN_VIEW)),
                StatusCode::SEE_OTHER,
            )
                .into_response();
        }
        Err(error) => error,
    };

    let message = error.to_string();
    let errors = match &error {
        Error::InvalidEmail => FieldErrors {
            email: Some("อีเมลไม่ถูกต้อง"),
            ..Default::default()
        },
        Error::DuplicateEmail => FieldErrors {
            email: Some("อีเมลนี้ถูกใช้งานแล้ว"),
            ..Default::default()
        },
        Error::TooWeak(_) | Error::Auth(_) => FieldErrors {
            password: Some(&message),
            ..Default::default()
        },
        _ => {
            tracing::error!("An unhandled error occurred while registering a user: {error}");
            return get_internal_server_error_redirect();
        }
    };

    registration_form(email, errors).into_response()
}
