//! The category page: income and expenses side by side, grouped by category.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    category::CategoryIcon,
    endpoints,
    html::{CARD_STYLE, base_with_alert},
    identity::Session,
    navigation::app_shell,
    store::TransactionFilter,
    transaction::{
        SavedQuery, Transaction, TransactionState, TransactionType, amount_colour, category_row,
        load_error_alert,
    },
};

type CategoryGroup = (String, Vec<Transaction>);

fn category_section(kind: TransactionType, groups: &[CategoryGroup]) -> Markup {
    html! {
        section class={ (CARD_STYLE) " space-y-4" } data-type=(kind)
        {
            h2 class={ "text-lg font-bold " (amount_colour(kind)) } { (kind.label()) }

            @for (category, transactions) in groups {
                div class="bg-gray-800 p-4 rounded-lg space-y-2" data-category=(category)
                {
                    div class={ "flex items-center gap-2 " (amount_colour(kind)) }
                    {
                        (CategoryIcon::lookup(category, kind).render("w-5 h-5"))
                        h3 class="font-semibold" { (category) }
                    }

                    ul class="space-y-2"
                    {
                        @for transaction in transactions {
                            (category_row(transaction))
                        }
                    }
                }
            }
        }
    }
}

/// Display every transaction of the user, grouped by type and then category.
pub async fn get_category_page(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Query(query): Query<SavedQuery>,
) -> Response {
    let mut view_model = state.view_model(session.clone(), TransactionFilter::ALL);
    let alert = match view_model.load().await {
        Ok(_) => query.alert(),
        Err(error) => Some(load_error_alert(&error)),
    };

    let (income, expense): (Vec<_>, Vec<_>) = view_model
        .group_by(|transaction| (transaction.kind, transaction.category.clone()))
        .into_iter()
        .map(|((kind, category), transactions)| (kind, (category, transactions)))
        .partition(|(kind, _)| *kind == TransactionType::Income);
    let income: Vec<CategoryGroup> = income.into_iter().map(|(_, group)| group).collect();
    let expense: Vec<CategoryGroup> = expense.into_iter().map(|(_, group)| group).collect();

    let content = html! {
        h2 class="text-2xl font-bold" { "หมวดหมู่" }

        div class="grid grid-cols-1 lg:grid-cols-2 gap-6"
        {
            (category_section(TransactionType::Income, &income))
            (category_section(TransactionType::Expense, &expense))
        }
    };
    let content = app_shell(endpoints::CATEGORY_VIEW, &session, &content);

    base_with_alert("หมวดหมู่", &[], &content, alert).into_response()
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
        test_utils::{
            ScriptedStore, assert_valid_html, make_transaction, parse_html_document, select_text,
            test_session,
        },
        transaction::{SavedQuery, TransactionState, TransactionType},
    };

    use super::get_category_page;

    #[tokio::test]
    async fn groups_each_type_by_category() {
        let store = Arc::new(ScriptedStore::with_transactions(vec![
            make_transaction(1, TransactionType::Income, 500, "เงินเดือน", date!(2024 - 01 - 01)),
            make_transaction(2, TransactionType::Expense, 150, "ค่าอาหาร", date!(2024 - 01 - 02)),
            make_transaction(3, TransactionType::Expense, 80, "ค่ารถ", date!(2024 - 01 - 03)),
            make_transaction(4, TransactionType::Expense, 60, "ค่าอาหาร", date!(2024 - 01 - 04)),
        ]));

        let response = get_category_page(
            State(TransactionState {
                store,
                removal_delay: Duration::ZERO,
            }),
            Extension(test_session()),
            Query(SavedQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_text(&html, "section[data-type=income] h3"),
            vec!["เงินเดือน"]
        );
        assert_eq!(
            select_text(&html, "section[data-type=expense] h3"),
            vec!["ค่าอาหาร", "ค่ารถ"]
        );
        assert_eq!(
            html.select(&Selector::parse("div[data-category='ค่าอาหาร'] li").unwrap())
                .count(),
            2
        );
        assert_eq!(
            html.select(&Selector::parse("section[data-type=income] svg[data-icon=wallet]").unwrap())
                .count(),
            2,
            "the group heading and the row should both show the wallet icon"
        );
    }
}
