//! Users, sessions and the identity provider that issues them.

mod password;
mod sqlite;

use std::fmt::Display;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::Error;

pub use password::{PasswordHash, ValidatedPassword};
pub use sqlite::{SQLiteIdentityProvider, create_identity_tables, insert_user};

/// The ID of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a user ID from a UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a new random user ID.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's ID.
    pub id: UserId,
    /// The email address the user signed up with.
    pub email: String,
}

/// Proof that a user has signed in.
///
/// Sessions are passed explicitly to every data store call so that reads and
/// writes are scoped to the signed-in user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// The opaque token the identity provider issued at sign-in.
    pub access_token: String,
    /// When the token stops being accepted.
    pub expires_at: OffsetDateTime,
    /// The signed-in user.
    pub user: User,
}

/// Authenticates users and issues sessions.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Check `email` and `password` and start a new session.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidCredentials] if the email is unknown or the
    /// password is wrong.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, Error>;

    /// Register a new user.
    ///
    /// Returns a session if the provider signs the user in straight away, or
    /// `None` if the user has to confirm their email or sign in first.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, Error>;

    /// End `session` so its token is no longer accepted.
    async fn sign_out(&self, session: &Session) -> Result<(), Error>;

    /// Get the user an access token belongs to.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotAuthenticated] if the token is unknown or expired.
    async fn get_user(&self, access_token: &str) -> Result<User, Error>;
}
