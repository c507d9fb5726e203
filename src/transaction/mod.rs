//! Transactions: the record itself, the view-model that every page is built
//! on, and the endpoints for creating and deleting transactions.

mod aggregation;
mod amount;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod view;
mod view_model;

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;

use crate::{
    AppState, Error,
    alert::Alert,
    identity::Session,
    store::{TransactionFilter, TransactionStore},
};

pub use aggregation::{PieSlice, Totals, group_by, pie_slices, totals};
pub use amount::Amount;
pub use core::{NewTransaction, Transaction, TransactionId, TransactionType};
pub use create_endpoint::{SavedQuery, create_transaction_endpoint};
pub use delete_endpoint::delete_transaction_endpoint;
pub use form::{TransactionForm, new_transaction_button, new_transaction_dialog};
pub use view::{amount_colour, category_row, ledger_row, signed_amount};
pub use view_model::{Confirmation, ItemStatus, PagePhase, TransactionViewModel};

/// The state needed to load, create or delete transactions.
#[derive(Clone)]
pub struct TransactionState {
    /// Where the transactions are kept.
    pub store: Arc<dyn TransactionStore>,
    /// How long to show a transaction as pending before deleting it.
    pub removal_delay: Duration,
}

impl TransactionState {
    /// A view-model over the transactions of `session`'s user.
    pub fn view_model(&self, session: Session, filter: TransactionFilter) -> TransactionViewModel {
        TransactionViewModel::new(session, self.store.clone(), filter)
            .with_removal_delay(self.removal_delay)
    }
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            removal_delay: state.removal_delay,
        }
    }
}

/// The alert shown on a page whose transactions could not be loaded.
pub fn load_error_alert(error: &Error) -> Alert {
    tracing::error!("could not load transactions: {error}");

    Alert::ErrorSimple {
        message: format!("❌ Error: {error}"),
    }
}
