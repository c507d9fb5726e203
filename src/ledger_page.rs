//! The income and expense pages: one transaction type, grouped by date.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{CARD_STYLE, base_with_alert},
    identity::Session,
    navigation::app_shell,
    store::TransactionFilter,
    transaction::{
        SavedQuery, TransactionState, TransactionType, TransactionViewModel, ledger_row,
        load_error_alert, new_transaction_button, new_transaction_dialog,
    },
};

fn endpoint(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => endpoints::INCOME_VIEW,
        TransactionType::Expense => endpoints::EXPENSE_VIEW,
    }
}

fn empty_message(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "ยังไม่มีรายการรายรับ",
        TransactionType::Expense => "ยังไม่มีรายการรายจ่าย",
    }
}

fn heading_colour(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "text-green-300",
        TransactionType::Expense => "text-red-300",
    }
}

fn ledger_view(kind: TransactionType, view_model: &TransactionViewModel) -> Markup {
    let groups = view_model.group_by(|transaction| transaction.date);

    html! {
        div class="flex justify-between items-center"
        {
            h2 class="text-2xl font-bold" { (kind.label()) }
            (new_transaction_button(kind))
        }

        div class="grid grid-cols-1 gap-6"
        {
            @for (date, transactions) in &groups {
                section class={ (CARD_STYLE) " space-y-2" } data-date=(date)
                {
                    h3 class={ "font-semibold " (heading_colour(kind)) } { (date) }

                    ul class="space-y-2"
                    {
                        @for transaction in transactions {
                            (ledger_row(transaction))
                        }
                    }
                }
            }

            @if groups.is_empty() {
                p class="text-center text-gray-500" { (empty_message(kind)) }
            }
        }

        (new_transaction_dialog(kind, endpoint(kind)))
    }
}

async fn get_ledger_page(
    kind: TransactionType,
    state: TransactionState,
    session: Session,
    query: SavedQuery,
) -> Response {
    let mut view_model = state.view_model(session.clone(), TransactionFilter::only(kind));
    let alert = match view_model.load().await {
        Ok(_) => query.alert(),
        Err(error) => Some(load_error_alert(&error)),
    };

    let content = app_shell(endpoint(kind), &session, &ledger_view(kind, &view_model));

    base_with_alert(kind.label(), &[], &content, alert).into_response()
}

/// Display the user's income grouped by date, newest first.
pub async fn get_income_page(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Query(query): Query<SavedQuery>,
) -> Response {
    get_ledger_page(TransactionType::Income, state, session, query).await
}

/// Display the user's expenses grouped by date, newest first.
pub async fn get_expense_page(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Query(query): Query<SavedQuery>,
) -> Response {
    get_ledger_page(TransactionType::Expense, state, session, query).await
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{
        Extension,
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        store::{SortOrder, TransactionFilter},
        test_utils::{
            ScriptedStore, StoreCall, assert_valid_html, make_transaction, parse_html_document,
            select_text, test_session,
        },
        transaction::{SavedQuery, TransactionState, TransactionType},
    };

    use super::{get_expense_page, get_income_page};

    fn get_state(store: Arc<ScriptedStore>) -> State<TransactionState> {
        State(TransactionState {
            store,
            removal_delay: Duration::ZERO,
        })
    }

    fn saved(saved: bool) -> Query<SavedQuery> {
        let query = if saved { "saved=1" } else { "" };
        Query(serde_urlencoded::from_str(query).unwrap())
    }

    #[tokio::test]
    async fn income_page_groups_by_date() {
        let store = Arc::new(ScriptedStore::with_transactions(vec![
            make_transaction(1, TransactionType::Income, 500, "เงินเดือน", date!(2024 - 01 - 01)),
            make_transaction(2, TransactionType::Expense, 150, "ค่าอาหาร", date!(2024 - 01 - 02)),
            make_transaction(3, TransactionType::Income, 200, "งานฟรีแลนซ์", date!(2024 - 01 - 03)),
            make_transaction(4, TransactionType::Income, 100, "อื่นๆ", date!(2024 - 01 - 03)),
        ]));

        let response =
            get_income_page(get_state(store.clone()), Extension(test_session()), saved(false))
                .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "section[data-date] h3"),
            vec!["2024-01-03", "2024-01-01"]
        );
        assert_eq!(
            html.select(&Selector::parse("section[data-date='2024-01-03'] li").unwrap())
                .count(),
            2
        );
        assert_eq!(
            store.calls()[0],
            StoreCall::Select(
                TransactionFilter::only(TransactionType::Income),
                SortOrder::DateDescending
            )
        );
        assert!(select_text(&html, "#alert-container p").is_empty());
    }

    #[tokio::test]
    async fn expense_page_shows_empty_state() {
        let store = Arc::new(ScriptedStore::default());

        let response =
            get_expense_page(get_state(store), Extension(test_session()), saved(false)).await;

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "p.text-gray-500"),
            vec!["ยังไม่มีรายการรายจ่าย"]
        );
        assert_eq!(
            html.select(&Selector::parse("dialog#new-expense-dialog").unwrap())
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn shows_saved_alert() {
        let store = Arc::new(ScriptedStore::default());

        let response =
            get_income_page(get_state(store), Extension(test_session()), saved(true)).await;

        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "#alert-container p"),
            vec!["✅ บันทึกสำเร็จ"]
        );
    }

    #[tokio::test]
    async fn shows_error_when_transactions_cannot_load() {
        let store = Arc::new(ScriptedStore::default());
        store.fail_with("network down");

        let response =
            get_income_page(get_state(store), Extension(test_session()), saved(true)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_eq!(
            select_text(&html, "#alert-container p"),
            vec!["❌ Error: network down"]
        );
    }
}
