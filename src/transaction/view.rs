//! Markup shared by the pages that list transactions.

use maud::{Markup, html};

use crate::{
    alert::ALERT_CONTAINER_ID,
    category::CategoryIcon,
    endpoints::{self, format_endpoint},
    html::{BUTTON_DELETE_STYLE, format_amount},
    transaction::{Transaction, TransactionType},
};

/// The question the browser asks before deleting a transaction.
pub const DELETE_CONFIRMATION: &str = "คุณแน่ใจหรือไม่ว่าต้องการลบรายการนี้?";

/// The amount with a sign from the transaction type, e.g. "+500.00 THB".
pub fn signed_amount(transaction: &Transaction) -> String {
    let sign = match transaction.kind {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };

    format!("{sign}{} THB", format_amount(transaction.amount))
}

pub fn amount_colour(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "text-green-400",
        TransactionType::Expense => "text-red-400",
    }
}

/// A button that deletes the transaction and fades out its list item.
pub fn delete_button(transaction: &Transaction) -> Markup {
    html! {
        button
            type="button"
            class=(BUTTON_DELETE_STYLE)
            hx-delete=(format_endpoint(endpoints::TRANSACTION, transaction.id))
            hx-confirm=(DELETE_CONFIRMATION)
            hx-target="closest li"
            hx-swap="outerHTML swap:300ms"
            hx-target-error={ "#" (ALERT_CONTAINER_ID) }
        {
            "ลบ"
        }
    }
}

/// A list item for the income and expense pages: category, note and amount.
pub fn ledger_row(transaction: &Transaction) -> Markup {
    html! {
        li
            class="flex justify-between items-center bg-gray-800 rounded-lg px-4 py-3 transaction-row"
            data-transaction-id=(transaction.id)
        {
            div
            {
                p class="font-medium" { (transaction.category) }

                @if let Some(note) = transaction.note() {
                    p class="text-sm text-gray-400" { (note) }
                }
            }

            div class="flex items-center gap-4"
            {
                span class={ "font-semibold " (amount_colour(transaction.kind)) }
                {
                    (signed_amount(transaction))
                }

                (delete_button(transaction))
            }
        }
    }
}

/// A list item for the category page: icon, account, date, note and amount.
pub fn category_row(transaction: &Transaction) -> Markup {
    let icon = CategoryIcon::lookup(&transaction.category, transaction.kind);

    html! {
        li
            class="flex justify-between items-center bg-gray-800 rounded-lg px-4 py-3 transaction-row"
            data-transaction-id=(transaction.id)
        {
            div class="flex items-center gap-3"
            {
                span class=(amount_colour(transaction.kind)) { (icon.render("w-5 h-5")) }

                div
                {
                    p class="text-sm text-gray-300" { (transaction.account) " | " (transaction.date) }

                    @if let Some(note) = transaction.note() {
                        p class="text-sm text-gray-400" { (note) }
                    }
                }
            }

            div class="flex items-center gap-4"
            {
                span class={ "font-semibold " (amount_colour(transaction.kind)) }
                {
                    (signed_amount(transaction))
                }

                (delete_button(transaction))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        test_utils::{assert_valid_html, make_transaction, parse_markup, select_text},
        transaction::{
            Amount, TransactionType,
            view::{DELETE_CONFIRMATION, category_row, ledger_row, signed_amount},
        },
    };

    #[test]
    fn signed_amount_uses_type() {
        let mut transaction = make_transaction(
            1,
            TransactionType::Income,
            500,
            "เงินเดือน",
            date!(2024 - 01 - 01),
        );
        assert_eq!(signed_amount(&transaction), "+500.00 THB");

        transaction.kind = TransactionType::Expense;
        transaction.amount = "1500.5".parse::<Amount>().unwrap();
        assert_eq!(signed_amount(&transaction), "-1,500.50 THB");
    }

    #[test]
    fn ledger_row_has_delete_button() {
        let mut transaction = make_transaction(
            7,
            TransactionType::Expense,
            150,
            "ค่าอาหาร",
            date!(2024 - 01 - 02),
        );
        transaction.note = Some("ข้าวมันไก่".to_owned());

        let html = parse_markup(ledger_row(&transaction));
        assert_valid_html(&html);

        assert_eq!(select_text(&html, "li p"), vec!["ค่าอาหาร", "ข้าวมันไก่"]);
        let button = html
            .select(&Selector::parse("button").unwrap())
            .next()
            .unwrap();
        assert_eq!(
            button.value().attr("hx-delete"),
            Some("/api/transactions/7")
        );
        assert_eq!(button.value().attr("hx-confirm"), Some(DELETE_CONFIRMATION));
        assert_eq!(button.value().attr("hx-target"), Some("closest li"));
        assert_eq!(
            button.value().attr("hx-swap"),
            Some("outerHTML swap:300ms")
        );
    }

    #[test]
    fn category_row_shows_account_and_date() {
        let transaction = make_transaction(
            3,
            TransactionType::Income,
            500,
            "งานฟรีแลนซ์",
            date!(2024 - 03 - 15),
        );

        let html = parse_markup(category_row(&transaction));

        assert_eq!(select_text(&html, "li p"), vec!["กรุงไทย | 2024-03-15"]);
        assert_eq!(
            html.select(&Selector::parse("svg[data-icon=gift]").unwrap())
                .count(),
            1
        );
    }
}
