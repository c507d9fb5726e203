//! Selects and builds the backend that stores users and transactions.

use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{
    Error,
    db::initialize,
    identity::{IdentityProvider, SQLiteIdentityProvider},
    store::{SQLiteTransactionStore, TransactionStore},
    supabase::SupabaseClient,
};

/// Where to find a hosted Supabase project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    /// The project URL, e.g. "https://abcdefgh.supabase.co".
    pub url: String,
    /// The public anon key of the project.
    pub anon_key: String,
}

/// The backend that provides identity and transaction storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// A local SQLite database file.
    Sqlite {
        /// The path to the database file, created if it does not exist.
        db_path: PathBuf,
    },
    /// A hosted Supabase project.
    Supabase(SupabaseConfig),
}

/// The boundaries the application talks to, built from a [BackendConfig].
pub type Backend = (Arc<dyn IdentityProvider>, Arc<dyn TransactionStore>);

impl BackendConfig {
    /// Connect to the backend.
    ///
    /// # Errors
    /// Returns an error if the SQLite database cannot be opened or initialized.
    pub fn build(&self) -> Result<Backend, Error> {
        match self {
            BackendConfig::Sqlite { db_path } => {
                let connection = Connection::open(db_path)?;
                tracing::info!("Using SQLite database at {}", db_path.display());

                Ok(sqlite_backend(connection)?)
            }
            BackendConfig::Supabase(config) => {
                tracing::info!("Using Supabase project at {}", config.url);
                let client = Arc::new(SupabaseClient::new(config));

                Ok((client.clone(), client))
            }
        }
    }
}

/// Initialize `connection` and share it between a SQLite identity provider and
/// transaction store.
pub fn sqlite_backend(connection: Connection) -> Result<Backend, Error> {
    initialize(&connection)?;
    let connection = Arc::new(Mutex::new(connection));

    Ok((
        Arc::new(SQLiteIdentityProvider::new(connection.clone())),
        Arc::new(SQLiteTransactionStore::new(connection)),
    ))
}
