//! Sets up the SQLite database used by the local backend.

use rusqlite::Connection;

use crate::{Error, identity::create_identity_tables, store::create_transaction_table};

/// Create the tables for users, sessions and transactions if they do not exist.
///
/// Foreign keys are enabled so that deleting a user also deletes their
/// sessions and transactions.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = connection.unchecked_transaction()?;
    create_identity_tables(&transaction)?;
    create_transaction_table(&transaction)?;
    transaction.commit()?;

    Ok(())
}
