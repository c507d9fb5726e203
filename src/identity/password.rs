//! Passwords for locally registered users.
//!
//! A password chosen at registration must pass a strength check before it is
//! hashed with bcrypt. Only the hash is ever stored.

use bcrypt::{hash, verify};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that is strong enough to register with.
#[derive(Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Check the strength of `password` chosen by the user registering `email`.
    ///
    /// A password built from the email address, or from the part before the
    /// `@`, is rated weaker.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's advice if the password scores
    /// below three out of four.
    pub fn new(password: &str, email: &str) -> Result<Self, Error> {
        let local_part = email.split('@').next().unwrap_or(email);
        let analysis = zxcvbn(password, &[email, local_part]);

        if matches!(analysis.score(), Score::Three | Score::Four) {
            return Ok(Self(password.to_owned()));
        }

        let advice = analysis
            .feedback()
            .map(Feedback::to_string)
            .unwrap_or_default();

        Err(Error::TooWeak(advice))
    }
}

impl std::fmt::Debug for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidatedPassword(********)")
    }
}

/// A bcrypt hash of a user's password, as kept in the `user` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with `cost` rounds of bcrypt.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if bcrypt fails, e.g. for an out of range
    /// cost.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the database.
    pub fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `attempt` is the password this hash was made from.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is malformed.
    pub fn matches(&self, attempt: &str) -> Result<bool, Error> {
        verify(attempt, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}
