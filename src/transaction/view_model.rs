//! The state behind every transaction page.
//!
//! A [TransactionViewModel] loads the signed-in user's transactions through a
//! [TransactionStore], exposes grouping and totals over them, and mediates
//! creating and removing transactions.

use std::{hash::Hash, sync::Arc, time::Duration};

use crate::{
    Error,
    identity::Session,
    store::{SortOrder, TransactionFilter, TransactionStore},
    transaction::{
        Transaction, TransactionForm, TransactionId, TransactionType,
        aggregation::{Totals, group_by, totals},
    },
};

/// How long a transaction is shown as pending before it is deleted.
pub const DEFAULT_REMOVAL_DELAY: Duration = Duration::from_millis(300);

/// Whether the transactions have been loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePhase {
    Loading,
    Ready,
}

/// Whether a listed transaction is on its way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStatus {
    Idle,
    PendingRemoval,
}

/// The user's answer to "are you sure you want to delete this?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

/// A loaded transaction and its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub transaction: Transaction,
    pub status: ItemStatus,
}

pub struct TransactionViewModel {
    session: Session,
    store: Arc<dyn TransactionStore>,
    filter: TransactionFilter,
    phase: PagePhase,
    items: Vec<Item>,
    removal_delay: Duration,
}

impl TransactionViewModel {
    /// Create a view-model for the transactions of `session`'s user that
    /// match `filter`. Nothing is loaded until [TransactionViewModel::load].
    pub fn new(
        session: Session,
        store: Arc<dyn TransactionStore>,
        filter: TransactionFilter,
    ) -> Self {
        Self {
            session,
            store,
            filter,
            phase: PagePhase::Loading,
            items: Vec::new(),
            removal_delay: DEFAULT_REMOVAL_DELAY,
        }
    }

    /// Wait `delay` between marking a transaction for removal and deleting it.
    pub fn with_removal_delay(mut self, delay: Duration) -> Self {
        self.removal_delay = delay;
        self
    }

    pub fn phase(&self) -> PagePhase {
        self.phase
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The loaded transactions, newest first.
    pub fn transactions(&self) -> Vec<Transaction> {
        self.items
            .iter()
            .map(|item| item.transaction.clone())
            .collect()
    }

    /// Fetch the user's transactions ordered by date, newest first.
    ///
    /// On success the page is ready and the previous items are replaced.
    /// On failure the items are left as they were.
    pub async fn load(&mut self) -> Result<Vec<Transaction>, Error> {
        let transactions = self
            .store
            .select(&self.session, self.filter, SortOrder::DateDescending)
            .await?;

        tracing::debug!(
            "Loaded {} transactions for user {}",
            transactions.len(),
            self.session.user.id
        );

        self.items = transactions
            .iter()
            .cloned()
            .map(|transaction| Item {
                transaction,
                status: ItemStatus::Idle,
            })
            .collect();
        self.phase = PagePhase::Ready;

        Ok(transactions)
    }

    /// Bucket the loaded transactions by `key_fn`, see [group_by].
    pub fn group_by<K, F>(&self, key_fn: F) -> Vec<(K, Vec<Transaction>)>
    where
        K: Eq + Hash + Clone,
        F: Fn(&Transaction) -> K,
    {
        group_by(&self.transactions(), key_fn)
    }

    /// Total income and expenses over the loaded transactions.
    pub fn totals(&self) -> Totals {
        totals(&self.transactions())
    }

    /// Store a new transaction of type `kind` from `form`.
    ///
    /// The loaded items are not changed, the caller should reload to see the
    /// new transaction.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingFields] without calling the store if the amount,
    /// date or category is blank. Store errors are passed through.
    pub async fn create(
        &self,
        form: &TransactionForm,
        kind: TransactionType,
    ) -> Result<Transaction, Error> {
        let new_transaction = form.validate(kind)?;

        let transaction = self.store.insert(&self.session, new_transaction).await?;
        tracing::info!(
            "User {} created {} transaction {}",
            self.session.user.id,
            transaction.kind,
            transaction.id
        );

        Ok(transaction)
    }

    /// Delete the transaction with `id` once the user has confirmed.
    ///
    /// Runs [TransactionViewModel::begin_remove] and then
    /// [TransactionViewModel::finish_remove].
    pub async fn remove(
        &mut self,
        id: TransactionId,
        confirmation: Confirmation,
    ) -> Result<(), Error> {
        if self.begin_remove(id, confirmation) {
            self.finish_remove(id).await
        } else {
            Ok(())
        }
    }

    /// Mark the transaction with `id` as pending removal.
    ///
    /// Returns false, and changes nothing, if the user declined.
    pub fn begin_remove(&mut self, id: TransactionId, confirmation: Confirmation) -> bool {
        if confirmation == Confirmation::Declined {
            return false;
        }

        self.set_status(id, ItemStatus::PendingRemoval);
        true
    }

    /// Wait for the removal delay, then delete the transaction with `id`.
    ///
    /// The item is dropped from the loaded items if the delete succeeded, and
    /// is back to [ItemStatus::Idle] otherwise. A delete that matched no rows
    /// counts as success: the transaction is gone either way, e.g. because it
    /// was deleted from another tab. An `id` that is not loaded is still
    /// deleted from the store.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the delete failed.
    pub async fn finish_remove(&mut self, id: TransactionId) -> Result<(), Error> {
        if !self.removal_delay.is_zero() {
            tokio::time::sleep(self.removal_delay).await;
        }

        match self.store.delete(&self.session, id).await {
            Ok(deleted) => {
                if deleted == 0 {
                    tracing::warn!("Transaction {id} was already deleted");
                } else {
                    tracing::info!("User {} deleted transaction {id}", self.session.user.id);
                }

                self.items.retain(|item| item.transaction.id != id);
                Ok(())
            }
            Err(error) => {
                tracing::error!("Could not delete transaction {id}: {error}");
                self.set_status(id, ItemStatus::Idle);
                Err(error)
            }
        }
    }

    fn set_status(&mut self, id: TransactionId, status: ItemStatus) {
        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.transaction.id == id)
        {
            item.status = status;
        }
    }
}
