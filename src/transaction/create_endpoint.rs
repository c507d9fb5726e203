//! Defines the endpoint for creating a new transaction.

use axum::{
    Extension,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    alert::Alert,
    endpoints,
    identity::Session,
    store::TransactionFilter,
    transaction::{TransactionForm, TransactionState, TransactionType},
};

/// The query parameter that asks a page to show the "saved" alert.
pub const SAVED_QUERY: &str = "saved=1";

/// The message shown after a transaction is saved.
pub const SAVED_MESSAGE: &str = "✅ บันทึกสำเร็จ";

/// The query parameters of a page a new transaction form redirects back to.
#[derive(Debug, Default, Deserialize)]
pub struct SavedQuery {
    saved: Option<String>,
}

impl SavedQuery {
    /// The "saved" alert, if the page was reached by saving a transaction.
    pub fn alert(&self) -> Option<Alert> {
        self.saved.as_ref().map(|_| Alert::SuccessSimple {
            message: SAVED_MESSAGE.to_owned(),
        })
    }
}

/// The pages a new transaction form may send the browser back to.
const REDIRECT_TARGETS: [&str; 4] = [
    endpoints::DASHBOARD_VIEW,
    endpoints::INCOME_VIEW,
    endpoints::EXPENSE_VIEW,
    endpoints::CATEGORY_VIEW,
];

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionForm {
    /// Whether the new transaction is income or an expense.
    #[serde(rename = "type")]
    pub kind: TransactionType,
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
    /// The page to go back to after saving.
    pub redirect_url: Option<String>,
}

impl CreateTransactionForm {
    fn fields(&self) -> TransactionForm {
        TransactionForm {
            account: self.account.clone(),
            date: self.date.clone(),
            category: self.category.clone(),
            amount: self.amount.clone(),
            note: self.note.clone(),
        }
    }

    /// The page to go back to, or the dashboard if `redirect_url` is not a
    /// transaction page.
    fn redirect_target(&self) -> &str {
        self.redirect_url
            .as_deref()
            .and_then(|url| REDIRECT_TARGETS.into_iter().find(|target| *target == url))
            .unwrap_or(endpoints::DASHBOARD_VIEW)
    }
}

/// A route handler for creating a new transaction.
///
/// Redirects to the page the form was on, which then shows a success alert.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Form(form): Form<CreateTransactionForm>,
) -> Response {
    let view_model = state.view_model(session, TransactionFilter::ALL);

    if let Err(error) = view_model.create(&form.fields(), form.kind).await {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(format!("{}?{SAVED_QUERY}", form.redirect_target())),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
