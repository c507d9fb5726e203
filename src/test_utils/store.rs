use std::sync::Mutex;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::{
    Error,
    identity::{Session, User, UserId},
    store::{SortOrder, TransactionFilter, TransactionStore},
    transaction::{Amount, NewTransaction, Transaction, TransactionId, TransactionType},
};

/// A call made to a [ScriptedStore].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StoreCall {
    Select(TransactionFilter, SortOrder),
    Insert(NewTransaction),
    Delete(TransactionId),
}

/// An in-memory transaction store that records its calls and can be told to fail.
#[derive(Debug, Default)]
pub(crate) struct ScriptedStore {
    transactions: Mutex<Vec<Transaction>>,
    calls: Mutex<Vec<StoreCall>>,
    failure: Mutex<Option<String>>,
}

impl ScriptedStore {
    pub(crate) fn with_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Mutex::new(transactions),
            ..Default::default()
        }
    }

    /// Make every following call fail with [Error::Store] and `message`.
    pub(crate) fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_owned());
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn transactions(&self) -> Vec<Transaction> {
        self.transactions.lock().unwrap().clone()
    }

    fn record(&self, call: StoreCall) -> Result<(), Error> {
        self.calls.lock().unwrap().push(call);

        match self.failure.lock().unwrap().as_ref() {
            Some(message) => Err(Error::Store(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl TransactionStore for ScriptedStore {
    async fn select(
        &self,
        _session: &Session,
        filter: TransactionFilter,
        order: SortOrder,
    ) -> Result<Vec<Transaction>, Error> {
        self.record(StoreCall::Select(filter, order))?;

        let mut selected: Vec<Transaction> = self
            .transactions()
            .into_iter()
            .filter(|transaction| filter.kind.is_none_or(|kind| kind == transaction.kind))
            .collect();

        if order == SortOrder::DateDescending {
            selected.sort_by(|a, b| b.date.cmp(&a.date));
        }

        Ok(selected)
    }

    async fn insert(
        &self,
        _session: &Session,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        self.record(StoreCall::Insert(transaction.clone()))?;

        let mut transactions = self.transactions.lock().unwrap();
        let id = transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let created = Transaction {
            id,
            kind: transaction.kind,
            account: transaction.account,
            date: transaction.date,
            category: transaction.category,
            amount: transaction.amount,
            note: transaction.note,
            description: None,
            created_at: Some(OffsetDateTime::now_utc()),
        };
        transactions.push(created.clone());

        Ok(created)
    }

    async fn delete(&self, _session: &Session, id: TransactionId) -> Result<usize, Error> {
        self.record(StoreCall::Delete(id))?;

        let mut transactions = self.transactions.lock().unwrap();
        let count_before = transactions.len();
        transactions.retain(|transaction| transaction.id != id);

        Ok(count_before - transactions.len())
    }
}

pub(crate) fn test_session() -> Session {
    Session {
        access_token: "test-token".to_owned(),
        expires_at: OffsetDateTime::now_utc() + time::Duration::hours(1),
        user: User {
            id: UserId::new(Uuid::nil()),
            email: "somchai@example.com".to_owned(),
        },
    }
}

pub(crate) fn make_transaction(
    id: TransactionId,
    kind: TransactionType,
    baht: u32,
    category: &str,
    date: Date,
) -> Transaction {
    Transaction {
        id,
        kind,
        account: "กรุงไทย".to_owned(),
        date,
        category: category.to_owned(),
        amount: Amount::from_baht(baht),
        note: None,
        description: None,
        created_at: None,
    }
}
