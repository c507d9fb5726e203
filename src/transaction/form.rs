//! The new transaction form: its fields, validation and markup.

use maud::{Markup, html};
use serde::Deserialize;
use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    alert::ALERT_CONTAINER_ID,
    category::{ACCOUNTS, DEFAULT_ACCOUNT, suggested_categories},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    transaction::{Amount, NewTransaction, TransactionType},
};

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The fields of the new transaction form, exactly as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub note: String,
}

impl TransactionForm {
    /// Check the form and convert it into a transaction of type `kind`.
    ///
    /// A blank account uses [DEFAULT_ACCOUNT] and a blank note is dropped.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingFields] if the amount, date or category is
    /// blank, [Error::InvalidAmount] or [Error::InvalidDate] if they cannot
    /// be parsed.
    pub fn validate(&self, kind: TransactionType) -> Result<NewTransaction, Error> {
        let amount = self.amount.trim();
        let date = self.date.trim();
        let category = self.category.trim();

        if amount.is_empty() || date.is_empty() || category.is_empty() {
            return Err(Error::MissingFields);
        }

        let amount: Amount = amount.parse()?;
        let date = Date::parse(date, DATE_FORMAT).map_err(|error| {
            tracing::debug!("could not parse date {date:?}: {error}");
            Error::InvalidDate(date.to_owned())
        })?;

        let account = match self.account.trim() {
            "" => DEFAULT_ACCOUNT.to_owned(),
            account => account.to_owned(),
        };
        let note = Some(self.note.trim())
            .filter(|note| !note.is_empty())
            .map(str::to_owned);

        Ok(NewTransaction {
            kind,
            account,
            date,
            category: category.to_owned(),
            amount,
            note,
        })
    }
}

/// The ID of the dialog for adding a transaction of type `kind`.
pub fn dialog_id(kind: TransactionType) -> String {
    format!("new-{kind}-dialog")
}

/// The "+ New" button that opens the dialog made by [new_transaction_dialog].
pub fn new_transaction_button(kind: TransactionType) -> Markup {
    html! {
        button
            type="button"
            class="px-3 py-1 text-sm bg-green-600 hover:bg-green-500 rounded"
            onclick={ "document.getElementById('" (dialog_id(kind)) "').showModal()" }
        {
            "+ New"
        }
    }
}

/// A modal dialog for adding a transaction of type `kind`.
///
/// After saving, the browser is sent to `redirect_url`.
pub fn new_transaction_dialog(kind: TransactionType, redirect_url: &str) -> Markup {
    let id = dialog_id(kind);
    let categories_id = format!("{kind}-categories");
    let title = match kind {
        TransactionType::Income => "เพิ่มรายรับใหม่",
        TransactionType::Expense => "เพิ่มรายจ่ายใหม่",
    };
    let today = OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date();
    let today = today.format(DATE_FORMAT).unwrap_or_default();

    html! {
        dialog
            id=(id)
            class="bg-gray-900 text-white p-6 rounded-xl w-full max-w-md backdrop:bg-black/70"
        {
            form
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error={ "#" (ALERT_CONTAINER_ID) }
                class="space-y-4"
            {
                h2 class="text-xl font-bold text-green-400" { (title) }

                input type="hidden" name="type" value=(kind.as_str());
                input type="hidden" name="redirect_url" value=(redirect_url);

                div
                {
                    label for={ (kind) "-account" } class=(FORM_LABEL_STYLE) { "บัญชี" }
                    select id={ (kind) "-account" } name="account" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for account in ACCOUNTS {
                            option value=(account) selected[account == DEFAULT_ACCOUNT] { (account) }
                        }
                    }
                }

                div
                {
                    label for={ (kind) "-date" } class=(FORM_LABEL_STYLE) { "วันที่" }
                    input
                        id={ (kind) "-date" }
                        type="date"
                        name="date"
                        value=(today)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for={ (kind) "-category" } class=(FORM_LABEL_STYLE) { "หมวดหมู่" }
                    input
                        id={ (kind) "-category" }
                        type="text"
                        name="category"
                        list=(categories_id)
                        placeholder="เลือกหรือพิมพ์หมวดหมู่"
                        class=(FORM_TEXT_INPUT_STYLE);
                    datalist id=(categories_id)
                    {
                        @for category in suggested_categories(kind) {
                            option value=(category) {}
                        }
                    }
                }

                div
                {
                    label for={ (kind) "-amount" } class=(FORM_LABEL_STYLE) { "จำนวนเงิน" }
                    input
                        id={ (kind) "-amount" }
                        type="number"
                        name="amount"
                        min="0"
                        step="0.01"
                        placeholder="0.00"
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for={ (kind) "-note" } class=(FORM_LABEL_STYLE) { "หมายเหตุ" }
                    textarea
                        id={ (kind) "-note" }
                        name="note"
                        rows="2"
                        class=(FORM_TEXT_INPUT_STYLE) {}
                }

                div class="flex gap-2"
                {
                    button
                        type="button"
                        class=(BUTTON_SECONDARY_STYLE)
                        onclick="this.closest('dialog').close()"
                    {
                        "ยกเลิก"
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "บันทึก" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        test_utils::{assert_hx_endpoint, assert_valid_html, must_get_form, parse_markup},
        transaction::{
            Amount, TransactionType,
            form::{TransactionForm, new_transaction_dialog},
        },
    };

    fn filled_form() -> TransactionForm {
        TransactionForm {
            account: "กสิกร".to_owned(),
            date: "2024-01-02".to_owned(),
            category: " ค่าอาหาร ".to_owned(),
            amount: "150.50".to_owned(),
            note: String::new(),
        }
    }

    #[test]
    fn validate_builds_transaction() {
        let got = filled_form().validate(TransactionType::Expense).unwrap();

        assert_eq!(got.kind, TransactionType::Expense);
        assert_eq!(got.account, "กสิกร");
        assert_eq!(got.date, date!(2024 - 01 - 02));
        assert_eq!(got.category, "ค่าอาหาร");
        assert_eq!(got.amount, "150.5".parse::<Amount>().unwrap());
        assert_eq!(got.note, None);
    }

    #[test]
    fn validate_rejects_blank_required_fields() {
        for clear in [
            |form: &mut TransactionForm| form.amount.clear(),
            |form: &mut TransactionForm| form.date = "  ".to_owned(),
            |form: &mut TransactionForm| form.category.clear(),
        ] {
            let mut form = filled_form();
            clear(&mut form);

            assert_eq!(
                form.validate(TransactionType::Income),
                Err(Error::MissingFields)
            );
        }
    }

    #[test]
    fn validate_rejects_bad_amount_and_date() {
        let mut form = filled_form();
        form.amount = "-5".to_owned();
        assert_eq!(
            form.validate(TransactionType::Income),
            Err(Error::InvalidAmount("-5".to_owned()))
        );

        let mut form = filled_form();
        form.date = "02/01/2024".to_owned();
        assert_eq!(
            form.validate(TransactionType::Income),
            Err(Error::InvalidDate("02/01/2024".to_owned()))
        );
    }

    #[test]
    fn validate_defaults_blank_account() {
        let mut form = filled_form();
        form.account.clear();
        form.note = "มื้อเที่ยง".to_owned();

        let got = form.validate(TransactionType::Expense).unwrap();

        assert_eq!(got.account, "กรุงไทย");
        assert_eq!(got.note.as_deref(), Some("มื้อเที่ยง"));
    }

    #[test]
    fn dialog_posts_to_transactions_api() {
        let markup = new_transaction_dialog(TransactionType::Income, "/income");
        let html = parse_markup(markup);
        assert_valid_html(&html);

        let form = must_get_form(&html);
        assert_hx_endpoint(&form, "/api/transactions", "hx-post");

        let hidden: Vec<(String, String)> = form
            .select(&Selector::parse("input[type=hidden]").unwrap())
            .map(|input| {
                (
                    input.value().attr("name").unwrap().to_owned(),
                    input.value().attr("value").unwrap().to_owned(),
                )
            })
            .collect();
        assert_eq!(
            hidden,
            vec![
                ("type".to_owned(), "income".to_owned()),
                ("redirect_url".to_owned(), "/income".to_owned()),
            ]
        );

        let suggestions = form
            .select(&Selector::parse("datalist option").unwrap())
            .count();
        assert_eq!(suggestions, 4);

        let title: String = html
            .select(&Selector::parse("h2").unwrap())
            .next()
            .unwrap()
            .text()
            .collect();
        assert_eq!(title, "เพิ่มรายรับใหม่");
    }
}
