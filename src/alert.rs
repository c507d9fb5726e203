//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered into the fixed `#alert-container` at the bottom of
//! every page. htmx requests target the container with `hx-target-error`, so
//! error responses replace its contents without touching the rest of the page.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

/// The ID of the element that alerts are swapped into.
pub const ALERT_CONTAINER_ID: &str = "alert-container";

/// A message to show the user after an action.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded.
    SuccessSimple { message: String },
    /// The action failed, with an explanation of what to do about it.
    Error { message: String, details: String },
    /// The action failed.
    ErrorSimple { message: String },
}

impl Alert {
    fn parts(&self) -> (bool, &str, Option<&str>) {
        match self {
            Alert::SuccessSimple { message } => (true, message, None),
            Alert::Error { message, details } => (false, message, Some(details)),
            Alert::ErrorSimple { message } => (false, message, None),
        }
    }

    /// Render the alert as a dismissable box.
    pub fn into_markup(self) -> Markup {
        let (is_success, message, details) = self.parts();
        let style = if is_success {
            "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
            bg-gray-900 border-green-600 text-green-400"
        } else {
            "flex items-start gap-3 p-4 rounded-lg shadow-lg border \
            bg-gray-900 border-red-600 text-red-400"
        };

        html! {
            div
                role="alert"
                class=(style)
                data-alert-kind=(if is_success { "success" } else { "error" })
            {
                div class="flex-1"
                {
                    p class="font-semibold" { (message) }

                    @if let Some(details) = details.filter(|details| !details.is_empty()) {
                        p class="mt-1 text-sm text-gray-300" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="ปิด"
                    class="text-gray-400 hover:text-white"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "✖"
                }
            }
        }
    }

    /// Render the alert as an HTML fragment for htmx to swap in.
    pub fn into_html(self) -> Html<String> {
        Html(self.into_markup().into_string())
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}
