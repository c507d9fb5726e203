use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};
use time::OffsetDateTime;

use crate::{
    alert::{ALERT_CONTAINER_ID, Alert},
    endpoints,
    transaction::Amount,
};

/// The text appended to every page title.
pub const SITE_NAME: &str = "ระบบรายรับ-รายจ่าย";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-green-600 \
    disabled:bg-green-800 hover:enabled:bg-green-500 text-white font-semibold rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full px-4 py-2 bg-gray-700 \
    hover:bg-gray-600 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-400 hover:text-red-300 text-sm \
    bg-transparent border-none cursor-pointer";

pub const LINK_STYLE: &str = "text-green-400 hover:text-green-300 underline";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-1 text-sm text-gray-300";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2 rounded text-sm \
    text-white bg-gray-800 border border-gray-700 placeholder-gray-500 \
    focus:ring-green-500 focus:border-green-500";

// Layout styles
pub const CARD_STYLE: &str = "bg-gray-900 border border-gray-800 rounded-xl p-6 shadow";
pub const PAGE_HEADING_STYLE: &str = "text-2xl font-bold mb-6";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    base_with_alert(title, head_elements, content, None)
}

/// Like [base], with `alert` already shown in the alert container.
pub fn base_with_alert(
    title: &str,
    head_elements: &[HeadElement],
    content: &Markup,
    alert: Option<Alert>,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="th"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (SITE_NAME) }
                link href={ (endpoints::STATIC) "/app.css" } rel="stylesheet";

                script src="https://cdn.tailwindcss.com" {}
                script src="https://unpkg.com/htmx.org@2.0.8" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4" {}

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="min-h-screen flex flex-col bg-black text-white"
            {
                div class="flex-1" { (content) }

                (footer(OffsetDateTime::now_utc().year()))

                div
                    id=(ALERT_CONTAINER_ID)
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {
                    @if let Some(alert) = alert {
                        (alert.into_markup())
                    }
                }
            }
        }
    }
}

fn footer(year: i32) -> Markup {
    html! {
        footer class="bg-gray-900 text-center text-sm text-gray-400 py-4"
        {
            "© " (year) " CSMJU Finance – จัดการการเงินง่าย ๆ ของคุณ"
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        section class="py-16 px-4 mx-auto max-w-screen-sm text-center"
        {
            h1 class="mb-4 text-7xl lg:text-9xl tracking-tight font-extrabold text-green-500"
            {
                (header)
            }

            p class="mb-4 text-3xl md:text-4xl tracking-tight font-bold" { (description) }

            p class="mb-4 text-xl md:text-2xl tracking-tight text-gray-300" { (fix) }

            a
                href=(endpoints::ROOT)
                class="inline-flex text-white bg-green-600 hover:bg-green-500
                    font-medium rounded text-sm px-5 py-2.5 text-center my-4"
            {
                "กลับหน้าหลัก"
            }
        }
    );

    base(title, &[], &content)
}

pub fn log_in_register(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            a href=(endpoints::ROOT) class="mb-6 text-2xl font-semibold text-green-400"
            {
                "CSMJU Finance"
            }

            div class={ "w-full sm:max-w-md " (CARD_STYLE) }
            {
                div class="space-y-4 md:space-y-6"
                {
                    h1 class="text-xl md:text-2xl font-bold leading-tight tracking-tight"
                    {
                        (form_title)
                    }

                    (form)
                }
            }
        }
    }
}

pub fn email_input(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label for="email" class=(FORM_LABEL_STYLE) { "อีเมล" }

            input
                type="email"
                name="email"
                id="email"
                placeholder="you@example.com"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                value=(email);

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

/// A password field named `name`.
///
/// Set `min_length` to zero to skip the browser's length check.
pub fn password_input(
    name: &str,
    label: &str,
    password: &str,
    min_length: u8,
    error_message: Option<&str>,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            input
                type="password"
                name=(name)
                id=(name)
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                value=(password)
                minlength=[(min_length > 0).then_some(min_length)];

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }
    }
}

pub fn loading_spinner() -> Markup {
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-white w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            circle cx="50" cy="50.5" r="45" stroke="#4B5563" stroke-width="10" {}
            path
                d="M50 5.5a45 45 0 0 1 45 45"
                stroke="currentColor"
                stroke-width="10"
                stroke-linecap="round" {}
        }
    }
}

/// Format `amount` with thousands separators and two decimal places, e.g. "1,234.50".
pub fn format_amount(amount: Amount) -> String {
    static INTEGER_FMT: OnceLock<Formatter> = OnceLock::new();

    let integer_fmt = INTEGER_FMT.get_or_init(|| {
        Formatter::currency("")
            .unwrap_or_else(|_| Formatter::new())
            .precision(Precision::Decimals(0))
    });

    let satang = amount.as_satang();
    let baht = satang / 100;

    // numfmt renders zero as "0" regardless of precision.
    let integer_part = if baht == 0 {
        "0".to_owned()
    } else {
        integer_fmt.fmt_string(baht as f64)
    };

    format!("{integer_part}.{:02}", satang % 100)
}

/// Format `amount` for a totals card, e.g. "THB 1,234.50".
pub fn format_currency(amount: Amount) -> String {
    format!("THB {}", format_amount(amount))
}
