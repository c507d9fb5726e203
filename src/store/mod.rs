//! The data store boundary for a user's transactions.

mod sqlite;

use async_trait::async_trait;

use crate::{
    Error,
    identity::Session,
    transaction::{NewTransaction, Transaction, TransactionId, TransactionType},
};

pub use sqlite::{SQLiteTransactionStore, create_transaction_table};

/// Which transactions to select.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Only select transactions of this type, or all transactions if `None`.
    pub kind: Option<TransactionType>,
}

impl TransactionFilter {
    /// Select every transaction.
    pub const ALL: TransactionFilter = TransactionFilter { kind: None };

    /// Select only transactions of type `kind`.
    pub const fn only(kind: TransactionType) -> Self {
        Self { kind: Some(kind) }
    }
}

/// The order to return selected transactions in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest date first.
    #[default]
    DateDescending,
    /// Whatever order the store keeps rows in, usually insertion order.
    Unordered,
}

/// Row-level access to the transactions table.
///
/// Every call is scoped to the user of the given [Session]; a user can never
/// read or delete another user's transactions.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Get the session user's transactions that match `filter`.
    async fn select(
        &self,
        session: &Session,
        filter: TransactionFilter,
        order: SortOrder,
    ) -> Result<Vec<Transaction>, Error>;

    /// Store a new transaction owned by the session user.
    async fn insert(
        &self,
        session: &Session,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error>;

    /// Delete the session user's transaction with `id`.
    ///
    /// Returns the number of rows deleted, which is zero if no such
    /// transaction exists.
    async fn delete(&self, session: &Session, id: TransactionId) -> Result<usize, Error>;
}
