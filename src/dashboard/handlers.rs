//! HTTP handler for the dashboard page.

use axum::{
    Extension,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{CARD_STYLE, HeadElement, PAGE_HEADING_STYLE, base_with_alert},
    identity::Session,
    navigation::app_shell,
    store::TransactionFilter,
    transaction::{
        SavedQuery, Totals, Transaction, TransactionState, TransactionType, load_error_alert,
        new_transaction_dialog,
    },
};

use super::{
    cards::{totals_cards, transaction_list_card},
    charts::{DashboardChart, ECHARTS_URL, chart_container, charts_script, summary_pie_chart},
};

const SUMMARY_CHART_ID: &str = "summary-chart";

fn of_kind(transactions: &[Transaction], kind: TransactionType) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .cloned()
        .collect()
}

fn dashboard_view(totals: &Totals, transactions: &[Transaction], chart: &DashboardChart) -> Markup {
    let income = of_kind(transactions, TransactionType::Income);
    let expenses = of_kind(transactions, TransactionType::Expense);

    html! {
        h2 class=(PAGE_HEADING_STYLE) { "ภาพรวมบัญชี" }

        div class="space-y-6"
        {
            (totals_cards(totals))

            section class=(CARD_STYLE) { (chart_container(chart)) }

            div class="grid grid-cols-1 lg:grid-cols-2 gap-6"
            {
                (transaction_list_card(TransactionType::Income, &income))
                (transaction_list_card(TransactionType::Expense, &expenses))
            }
        }

        (new_transaction_dialog(TransactionType::Income, endpoints::DASHBOARD_VIEW))
        (new_transaction_dialog(TransactionType::Expense, endpoints::DASHBOARD_VIEW))
    }
}

/// Display the totals, the income/expense chart and every transaction of the
/// signed-in user.
pub async fn get_dashboard_page(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Query(query): Query<SavedQuery>,
) -> Response {
    let mut view_model = state.view_model(session.clone(), TransactionFilter::ALL);
    let alert = match view_model.load().await {
        Ok(_) => query.alert(),
        Err(error) => Some(load_error_alert(&error)),
    };

    let totals = view_model.totals();
    let charts = [DashboardChart {
        id: SUMMARY_CHART_ID,
        options: summary_pie_chart(&totals).to_string(),
    }];

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        charts_script(&charts),
    ];

    let content = app_shell(
        endpoints::DASHBOARD_VIEW,
        &session,
        &dashboard_view(&totals, &view_model.transactions(), &charts[0]),
    );

    base_with_alert("บัญชี", &scripts, &content, alert).into_response()
}
