use axum::{
    Extension,
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};

use crate::{
    identity::Session,
    store::TransactionFilter,
    transaction::{Confirmation, TransactionId, TransactionState},
};

/// A route handler for deleting a transaction.
///
/// The browser asks the user to confirm before sending the request, so the
/// deletion is treated as confirmed.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let mut view_model = state.view_model(session, TransactionFilter::ALL);
    view_model.begin_remove(transaction_id, Confirmation::Confirmed);

    match view_model.finish_remove(transaction_id).await {
        // The status code has to be 200 OK or htmx will not remove the list item.
        Ok(()) => Html("").into_response(),
        Err(error) => error.into_alert_response(),
    }
}
