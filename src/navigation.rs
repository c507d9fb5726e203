//! The sidebar menu and page header shared by every signed-in page.

use maud::{Markup, html};

use crate::{endpoints, identity::Session};

const SIDEBAR_ID: &str = "sidebar";

/// A link in the sidebar menu.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_html(self) -> Markup {
        let style = if self.is_current {
            "flex items-center gap-2 px-3 py-2 rounded-lg bg-gray-800 text-green-400"
        } else {
            "flex items-center gap-2 px-3 py-2 rounded-lg hover:bg-gray-800 hover:text-green-400"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
}

impl NavBar<'_> {
    /// Get the sidebar menu.
    ///
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str) -> NavBar<'_> {
        let links = [
            (endpoints::DASHBOARD_VIEW, "🏠 บัญชี"),
            (endpoints::INCOME_VIEW, "💰 รายรับ"),
            (endpoints::EXPENSE_VIEW, "🛒 รายจ่าย"),
            (endpoints::CATEGORY_VIEW, "📂 หมวดหมู่"),
        ]
        .into_iter()
        .map(|(url, title)| Link {
            url,
            title,
            is_current: active_endpoint == url,
        })
        .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        html!(
            aside
                id=(SIDEBAR_ID)
                class="fixed md:static top-0 left-0 min-h-screen w-64 bg-gray-900 p-6
                    border-r border-gray-800 flex-col gap-6 z-50 hidden md:flex"
            {
                button
                    type="button"
                    class="absolute top-4 right-4 md:hidden"
                    aria-label="ปิดเมนู"
                    onclick={ "document.getElementById('" (SIDEBAR_ID) "').classList.add('hidden')" }
                {
                    "✖"
                }

                h2 class="text-lg font-bold text-green-400" { "เมนู" }

                nav class="flex flex-col gap-2"
                {
                    @for link in self.links {
                        (link.into_html())
                    }
                }
            }
        )
    }
}

/// The header with the app title, a greeting and the log-out button.
fn header(session: &Session) -> Markup {
    html! {
        header
            class="flex flex-col sm:flex-row justify-between items-start sm:items-center
                bg-gray-900 p-4 rounded-xl shadow gap-4"
        {
            div class="flex items-center gap-4"
            {
                button
                    type="button"
                    class="md:hidden text-white"
                    aria-label="เปิดเมนู"
                    onclick={ "document.getElementById('" (SIDEBAR_ID) "').classList.remove('hidden')" }
                {
                    "☰"
                }

                div
                {
                    h1 class="text-xl font-bold text-green-400" { "รายรับ - รายจ่าย" }
                    p class="text-gray-400 text-sm" { "สวัสดี, " (session.user.email) }
                }
            }

            a
                href=(endpoints::LOG_OUT)
                class="px-4 py-2 bg-red-600 rounded-lg hover:bg-red-500"
            {
                "ออกจากระบบ"
            }
        }
    }
}

/// Lay out `content` next to the sidebar, under the header.
pub fn app_shell(active_endpoint: &str, session: &Session, content: &Markup) -> Markup {
    html! {
        div class="flex min-h-full bg-gradient-to-br from-gray-950 via-gray-900 to-gray-950"
        {
            (NavBar::new(active_endpoint).into_html())

            main class="flex-1 p-4 sm:p-8 space-y-8"
            {
                (header(session))
                (content)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use maud::html;
    use scraper::Selector;

    use crate::{
        endpoints,
        navigation::{NavBar, app_shell},
        test_utils::{assert_valid_html, parse_markup, select_text, test_session},
    };

    #[test]
    fn marks_current_link() {
        let html = parse_markup(NavBar::new(endpoints::EXPENSE_VIEW).into_html());
        assert_valid_html(&html);

        assert_eq!(
            select_text(&html, "nav a"),
            vec!["🏠 บัญชี", "💰 รายรับ", "🛒 รายจ่าย", "📂 หมวดหมู่"]
        );
        let current: Vec<_> = html
            .select(&Selector::parse("a[aria-current=page]").unwrap())
            .map(|link| link.value().attr("href").unwrap())
            .collect();
        assert_eq!(current, vec![endpoints::EXPENSE_VIEW]);
    }

    #[test]
    fn shell_greets_user_and_links_to_log_out() {
        let html = parse_markup(app_shell(
            endpoints::DASHBOARD_VIEW,
            &test_session(),
            &html!(p { "content" }),
        ));

        assert_eq!(
            select_text(&html, "header p"),
            vec!["สวัสดี, somchai@example.com"]
        );
        let log_out = html
            .select(&Selector::parse("header a").unwrap())
            .next()
            .unwrap();
        assert_eq!(log_out.value().attr("href"), Some(endpoints::LOG_OUT));
        assert_eq!(select_text(&html, "main > p"), vec!["content"]);
    }
}
