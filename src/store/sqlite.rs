//! A transaction store backed by SQLite.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{Connection, Row, params, types::Type};
use time::OffsetDateTime;

use crate::{
    Error,
    identity::Session,
    store::{SortOrder, TransactionFilter, TransactionStore},
    transaction::{Amount, NewTransaction, Transaction, TransactionId, TransactionType},
};

/// Create the transactions table.
///
/// Amounts are stored as an integer number of satang.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            account TEXT NOT NULL,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK (amount >= 0),
            note TEXT,
            description TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_user_date
            ON transactions(user_id, date);",
    )
}

/// Transactions stored in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a store using the shared `connection`.
    ///
    /// The tables must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, type, account, date, category, amount, note, description, created_at \
    FROM transactions";

fn map_row_to_transaction(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let kind: String = row.get(1)?;
    let kind = kind
        .parse::<TransactionType>()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(error)))?;
    let amount = Amount::from_satang(row.get(5)?).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(error))
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        kind,
        account: row.get(2)?,
        date: row.get(3)?,
        category: row.get(4)?,
        amount,
        note: row.get(6)?,
        description: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[async_trait]
impl TransactionStore for SQLiteTransactionStore {
    async fn select(
        &self,
        session: &Session,
        filter: TransactionFilter,
        order: SortOrder,
    ) -> Result<Vec<Transaction>, Error> {
        let mut query = format!("{SELECT_COLUMNS} WHERE user_id = ?1 AND (?2 IS NULL OR type = ?2)");

        match order {
            SortOrder::DateDescending => query.push_str(" ORDER BY date DESC, id DESC"),
            SortOrder::Unordered => {}
        }

        let connection = self.lock()?;
        let mut statement = connection.prepare(&query)?;
        let transactions = statement
            .query_map(
                params![
                    session.user.id.to_string(),
                    filter.kind.map(|kind| kind.as_str())
                ],
                map_row_to_transaction,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    async fn insert(
        &self,
        session: &Session,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let connection = self.lock()?;

        let created = connection.query_row(
            "INSERT INTO transactions
                (user_id, type, account, date, category, amount, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            RETURNING id, type, account, date, category, amount, note, description, created_at",
            params![
                session.user.id.to_string(),
                transaction.kind.as_str(),
                transaction.account,
                transaction.date,
                transaction.category,
                transaction.amount.as_satang(),
                transaction.note,
                OffsetDateTime::now_utc(),
            ],
            map_row_to_transaction,
        )?;

        Ok(created)
    }

    async fn delete(&self, session: &Session, id: TransactionId) -> Result<usize, Error> {
        let rows_affected = self.lock()?.execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
            params![id, session.user.id.to_string()],
        )?;

        Ok(rows_affected)
    }
}
