//! Suggested categories and accounts, and the icons shown next to categories.

use maud::{Markup, PreEscaped, html};

use crate::transaction::TransactionType;

/// Categories suggested when adding income.
pub const INCOME_CATEGORIES: [&str; 4] = ["เงินเดือน", "ขายของออนไลน์", "งานฟรีแลนซ์", "อื่นๆ"];

/// Categories suggested when adding an expense.
pub const EXPENSE_CATEGORIES: [&str; 10] = [
    "ค่าอาหาร",
    "ค่าการศึกษา",
    "ค่าช้อปปิ้ง",
    "ค่าไฟ",
    "ค่าน้ำ",
    "ค่ารถ",
    "ค่าบ้าน",
    "ค่าสังสรรค์",
    "ภาษี",
    "บริจาค",
];

/// The accounts offered in the new transaction form.
pub const ACCOUNTS: [&str; 3] = ["กรุงไทย", "กสิกร", "เงินสด"];

/// The account used when none is given.
pub const DEFAULT_ACCOUNT: &str = ACCOUNTS[0];

/// The suggested categories for transactions of type `kind`.
///
/// Users may still type any category.
pub fn suggested_categories(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Income => &INCOME_CATEGORIES,
        TransactionType::Expense => &EXPENSE_CATEGORIES,
    }
}

/// The icon drawn next to a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryIcon {
    Wallet,
    ShoppingCart,
    Gift,
    Coffee,
    BookOpen,
}

impl CategoryIcon {
    /// Pick the icon for `category`, falling back to a default for `kind`.
    pub fn lookup(category: &str, kind: TransactionType) -> Self {
        match category {
            "เงินเดือน" => CategoryIcon::Wallet,
            "ขายของออนไลน์" => CategoryIcon::ShoppingCart,
            "งานฟรีแลนซ์" => CategoryIcon::Gift,
            "ค่าอาหาร" => CategoryIcon::Coffee,
            "ค่าการศึกษา" => CategoryIcon::BookOpen,
            _ => match kind {
                TransactionType::Income => CategoryIcon::Wallet,
                TransactionType::Expense => CategoryIcon::ShoppingCart,
            },
        }
    }

    /// A stable name for the icon, used in markup.
    pub fn name(self) -> &'static str {
        match self {
            CategoryIcon::Wallet => "wallet",
            CategoryIcon::ShoppingCart => "shopping-cart",
            CategoryIcon::Gift => "gift",
            CategoryIcon::Coffee => "coffee",
            CategoryIcon::BookOpen => "book-open",
        }
    }

    fn svg_body(self) -> &'static str {
        match self {
            CategoryIcon::Wallet => {
                r#"<path d="M19 7V4a1 1 0 0 0-1-1H5a2 2 0 0 0 0 4h15a1 1 0 0 1 1 1v4h-3a2 2 0 0 0 0 4h3a1 1 0 0 0 1-1v-2a1 1 0 0 0-1-1"/><path d="M3 5v14a2 2 0 0 0 2 2h15a1 1 0 0 0 1-1v-4"/>"#
            }
            CategoryIcon::ShoppingCart => {
                r#"<circle cx="8" cy="21" r="1"/><circle cx="19" cy="21" r="1"/><path d="M2.05 2.05h2l2.66 12.42a2 2 0 0 0 2 1.58h9.78a2 2 0 0 0 1.95-1.57l1.65-7.43H5.12"/>"#
            }
            CategoryIcon::Gift => {
                r#"<rect x="3" y="8" width="18" height="4" rx="1"/><path d="M12 8v13"/><path d="M19 12v7a2 2 0 0 1-2 2H7a2 2 0 0 1-2-2v-7"/><path d="M7.5 8a2.5 2.5 0 0 1 0-5C11 3 12 8 12 8s1-5 4.5-5a2.5 2.5 0 0 1 0 5"/>"#
            }
            CategoryIcon::Coffee => {
                r#"<path d="M10 2v2"/><path d="M14 2v2"/><path d="M6 2v2"/><path d="M16 8a1 1 0 0 1 1 1v8a4 4 0 0 1-4 4H7a4 4 0 0 1-4-4V9a1 1 0 0 1 1-1h14a4 4 0 1 1 0 8h-1"/>"#
            }
            CategoryIcon::BookOpen => {
                r#"<path d="M2 3h6a4 4 0 0 1 4 4v14a3 3 0 0 0-3-3H2z"/><path d="M22 3h-6a4 4 0 0 0-4 4v14a3 3 0 0 1 3-3h7z"/>"#
            }
        }
    }

    /// Render the icon as an inline SVG.
    pub fn render(self, class: &str) -> Markup {
        html! {
            svg
                xmlns="http://www.w3.org/2000/svg"
                viewBox="0 0 24 24"
                fill="none"
                stroke="currentColor"
                stroke-width="2"
                stroke-linecap="round"
                stroke-linejoin="round"
                aria-hidden="true"
                data-icon=(self.name())
                class=(class)
            {
                (PreEscaped(self.svg_body()))
            }
        }
    }
}
