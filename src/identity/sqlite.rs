//! An identity provider that keeps users and sessions in SQLite.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use email_address::EmailAddress;
use rusqlite::{Connection, OptionalExtension, params, types::Type};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{
    Error,
    identity::{IdentityProvider, PasswordHash, Session, User, UserId, ValidatedPassword},
};

/// How long a session issued by [SQLiteIdentityProvider] is accepted.
///
/// The auth cookie usually expires well before this.
pub const SESSION_DURATION: Duration = Duration::days(7);

/// Create the tables for users and their sessions.
pub fn create_identity_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS user (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS session (
            token TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES user(id) ON DELETE CASCADE,
            expires_at INTEGER NOT NULL
        );",
    )
}

/// Users and sessions stored in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteIdentityProvider {
    connection: Arc<Mutex<Connection>>,
    password_cost: u32,
}

impl SQLiteIdentityProvider {
    /// Create a provider using the shared `connection`.
    ///
    /// The tables must already exist, see [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            password_cost: PasswordHash::DEFAULT_COST,
        }
    }

    /// Use `cost` rounds when hashing new passwords.
    #[cfg(test)]
    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

/// Insert a user with an already hashed password.
pub fn insert_user(
    email: &str,
    password_hash: &PasswordHash,
    connection: &Connection,
) -> Result<User, Error> {
    let id = UserId::new_random();

    connection.execute(
        "INSERT INTO user (id, email, password) VALUES (?1, ?2, ?3)",
        params![id.to_string(), email, password_hash.as_str()],
    )?;

    Ok(User {
        id,
        email: email.to_owned(),
    })
}

fn parse_user_id(text: &str) -> Result<UserId, rusqlite::Error> {
    Uuid::parse_str(text)
        .map(UserId::new)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(error)))
}

#[async_trait]
impl IdentityProvider for SQLiteIdentityProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error> {
        let row = self
            .lock()?
            .query_row(
                "SELECT id, email, password FROM user WHERE email = ?1",
                [email.trim()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, email, password_hash)) = row else {
            return Err(Error::InvalidCredentials);
        };

        // The database lock is not held while bcrypt runs.
        if !PasswordHash::from_stored(password_hash).matches(password)? {
            return Err(Error::InvalidCredentials);
        }

        let user = User {
            id: parse_user_id(&id)?,
            email,
        };
        let access_token = Uuid::new_v4().simple().to_string();
        let now = OffsetDateTime::now_utc();
        let expires_at = now + SESSION_DURATION;

        let connection = self.lock()?;
        let purged = connection.execute(
            "DELETE FROM session WHERE expires_at <= ?1",
            [now.unix_timestamp()],
        )?;
        if purged > 0 {
            tracing::debug!("Purged {purged} expired sessions");
        }

        connection.execute(
            "INSERT INTO session (token, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![access_token, id, expires_at.unix_timestamp()],
        )?;

        tracing::info!("User {} signed in", user.id);

        Ok(Session {
            access_token,
            expires_at,
            user,
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, Error> {
        let email = email.trim();

        if !EmailAddress::is_valid(email) {
            return Err(Error::InvalidEmail);
        }

        let password = ValidatedPassword::new(password, email)?;
        let password_hash = PasswordHash::new(password, self.password_cost)?;

        let user = insert_user(email, &password_hash, &*self.lock()?)?;
        tracing::info!("Registered user {}", user.id);

        Ok(None)
    }

    async fn sign_out(&self, session: &Session) -> Result<(), Error> {
        self.lock()?.execute(
            "DELETE FROM session WHERE token = ?1",
            [&session.access_token],
        )?;

        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<User, Error> {
        let connection = self.lock()?;

        let row = connection
            .query_row(
                "SELECT user.id, user.email FROM session
                INNER JOIN user ON user.id = session.user_id
                WHERE session.token = ?1 AND session.expires_at > ?2",
                params![access_token, OffsetDateTime::now_utc().unix_timestamp()],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;

        match row {
            Some((id, email)) => Ok(User {
                id: parse_user_id(&id)?,
                email,
            }),
            None => Err(Error::NotAuthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        identity::{IdentityProvider, SQLiteIdentityProvider},
    };

    const EMAIL: &str = "somchai@example.com";
    const PASSWORD: &str = "asomewhatlongpassword1";

    fn get_provider() -> SQLiteIdentityProvider {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteIdentityProvider::new(Arc::new(Mutex::new(connection))).with_password_cost(4)
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let provider = get_provider();

        let session = provider.sign_up(EMAIL, PASSWORD).await.unwrap();
        assert_eq!(session, None, "sign up should not start a session");

        let session = provider
            .sign_in_with_password(EMAIL, PASSWORD)
            .await
            .unwrap();
        assert_eq!(session.user.email, EMAIL);

        let user = provider.get_user(&session.access_token).await.unwrap();
        assert_eq!(user, session.user);
    }

    #[tokio::test]
    async fn sign_up_rejects_invalid_email() {
        let provider = get_provider();

        let result = provider.sign_up("not-an-email", PASSWORD).await;

        assert_eq!(result, Err(Error::InvalidEmail));
    }

    #[tokio::test]
    async fn sign_up_rejects_weak_password() {
        let provider = get_provider();

        let result = provider.sign_up(EMAIL, "password").await;

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[tokio::test]
    async fn sign_up_rejects_duplicate_email() {
        let provider = get_provider();
        provider.sign_up(EMAIL, PASSWORD).await.unwrap();

        let result = provider.sign_up(EMAIL, PASSWORD).await;

        assert_eq!(result, Err(Error::DuplicateEmail));
    }

    #[tokio::test]
    async fn sign_in_fails_with_wrong_password() {
        let provider = get_provider();
        provider.sign_up(EMAIL, PASSWORD).await.unwrap();

        let result = provider
            .sign_in_with_password(EMAIL, "not the password")
            .await;

        assert_eq!(result, Err(Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn sign_in_fails_with_unknown_email() {
        let provider = get_provider();

        let result = provider
            .sign_in_with_password("nobody@example.com", PASSWORD)
            .await;

        assert_eq!(result, Err(Error::InvalidCredentials));
    }

    #[tokio::test]
    async fn sign_out_invalidates_token() {
        let provider = get_provider();
        provider.sign_up(EMAIL, PASSWORD).await.unwrap();
        let session = provider
            .sign_in_with_password(EMAIL, PASSWORD)
            .await
            .unwrap();

        provider.sign_out(&session).await.unwrap();

        assert_eq!(
            provider.get_user(&session.access_token).await,
            Err(Error::NotAuthenticated)
        );
    }

    #[tokio::test]
    async fn get_user_rejects_unknown_token() {
        let provider = get_provider();

        assert_eq!(
            provider.get_user("notatoken").await,
            Err(Error::NotAuthenticated)
        );
    }

    #[tokio::test]
    async fn get_user_rejects_expired_token() {
        let provider = get_provider();
        provider.sign_up(EMAIL, PASSWORD).await.unwrap();
        let session = provider
            .sign_in_with_password(EMAIL, PASSWORD)
            .await
            .unwrap();
        provider
            .connection
            .lock()
            .unwrap()
            .execute("UPDATE session SET expires_at = 0", [])
            .unwrap();

        assert_eq!(
            provider.get_user(&session.access_token).await,
            Err(Error::NotAuthenticated)
        );
    }

    fn count_sessions(provider: &SQLiteIdentityProvider) -> i64 {
        provider
            .connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn sign_in_purges_expired_sessions() {
        let provider = get_provider();
        provider.sign_up(EMAIL, PASSWORD).await.unwrap();
        let expired = provider
            .sign_in_with_password(EMAIL, PASSWORD)
            .await
            .unwrap();
        provider
            .connection
            .lock()
            .unwrap()
            .execute("UPDATE session SET expires_at = 0", [])
            .unwrap();

        let session = provider
            .sign_in_with_password(EMAIL, PASSWORD)
            .await
            .unwrap();

        assert_eq!(count_sessions(&provider), 1);
        assert_eq!(
            provider.get_user(&expired.access_token).await,
            Err(Error::NotAuthenticated)
        );
        assert_eq!(
            provider.get_user(&session.access_token).await,
            Ok(session.user)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_sign_ins_each_get_a_session() {
        let provider = get_provider();
        provider.sign_up(EMAIL, PASSWORD).await.unwrap();

        let first = tokio::spawn({
            let provider = provider.clone();
            async move { provider.sign_in_with_password(EMAIL, PASSWORD).await }
        });
        let second = tokio::spawn({
            let provider = provider.clone();
            async move { provider.sign_in_with_password(EMAIL, PASSWORD).await }
        });

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_eq!(count_sessions(&provider), 2);
    }
}
