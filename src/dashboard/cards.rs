//! The totals cards and short transaction lists shown on the dashboard.

use maud::{Markup, html};

use crate::{
    html::{CARD_STYLE, format_amount, format_currency},
    transaction::{Totals, Transaction, TransactionType, amount_colour, new_transaction_button},
};

fn total_card(kind: TransactionType, total: String) -> Markup {
    html! {
        div class=(CARD_STYLE) data-total=(kind)
        {
            h3 class="text-sm text-gray-400" { (kind.label()) }
            p class={ "text-2xl font-bold " (amount_colour(kind)) } { (total) }
        }
    }
}

/// One card each for total income and total expenses.
pub(super) fn totals_cards(totals: &Totals) -> Markup {
    html! {
        div class="grid grid-cols-1 sm:grid-cols-2 gap-4"
        {
            (total_card(TransactionType::Income, format_currency(totals.income)))
            (total_card(TransactionType::Expense, format_currency(totals.expense)))
        }
    }
}

fn list_empty_message(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "ยังไม่มีรายรับ",
        TransactionType::Expense => "ยังไม่มีรายจ่าย",
    }
}

/// A card listing every transaction of `kind` by title and amount.
pub(super) fn transaction_list_card(kind: TransactionType, transactions: &[Transaction]) -> Markup {
    html! {
        section class={ (CARD_STYLE) " space-y-3" } data-type=(kind)
        {
            div class="flex justify-between items-center"
            {
                h3 class="text-lg font-semibold" { (kind.label()) }
                (new_transaction_button(kind))
            }

            @if transactions.is_empty() {
                p class="text-sm text-gray-500" { (list_empty_message(kind)) }
            } @else {
                ul class="divide-y divide-gray-800"
                {
                    @for transaction in transactions {
                        li class="flex justify-between py-2" data-transaction-id=(transaction.id)
                        {
                            span { (transaction.title()) }
                            span class=(amount_colour(kind)) { (format_amount(transaction.amount)) }
                        }
                    }
                }
            }
        }
    }
}
