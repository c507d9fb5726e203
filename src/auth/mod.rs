//! Cookie based authentication: the log-in, registration and log-out routes
//! and the middleware that guards every other page.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod redirect;
mod register;
mod token;

pub use cookie::{
    DEFAULT_COOKIE_DURATION, REMEMBER_ME_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie,
};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use redirect::{build_log_in_redirect_url, parse_redirect_url};
pub use register::{get_register_page, register_user};

#[cfg(test)]
pub use cookie::COOKIE_TOKEN;

#[cfg(test)]
pub use middleware::AuthState;
