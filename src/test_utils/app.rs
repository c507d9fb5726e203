use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    AppState,
    db::initialize,
    identity::{IdentityProvider, SQLiteIdentityProvider},
    store::{SQLiteTransactionStore, TransactionStore},
};

pub(crate) const TEST_EMAIL: &str = "somchai@example.com";
pub(crate) const TEST_PASSWORD: &str = "asomewhatlongpassword1";
pub(crate) const TEST_SECRET: &str = "averysecretsecret";

/// An app state backed by an in-memory database with one registered user,
/// [TEST_EMAIL] with the password [TEST_PASSWORD].
pub(crate) async fn test_app_state() -> AppState {
    let connection = Connection::open_in_memory().unwrap();
    initialize(&connection).unwrap();
    let connection = Arc::new(Mutex::new(connection));

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(SQLiteIdentityProvider::new(connection.clone()).with_password_cost(4));
    identity.sign_up(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    let store: Arc<dyn TransactionStore> = Arc::new(SQLiteTransactionStore::new(connection));

    AppState::from_backend((identity, store), TEST_SECRET)
}
