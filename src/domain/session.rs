//! Local demo account.
//!
//! Credentials are kept in plaintext in the local store. This is a
//! proof-of-concept sign-in, not an authentication boundary.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::DomainError;

/// Store key holding the credentials JSON.
pub const CREDENTIALS_KEY: &str = "ayushUser";

/// Store key holding the login flag.
pub const LOGGED_IN_KEY: &str = "loggedIn";

/// Value of the login flag while signed in.
pub const LOGGED_IN_MARKER: &str = "true";

/// The single stored account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build from raw form input, trimming both fields.
    ///
    /// # Errors
    /// `DomainError::MissingInput` if either field is blank.
    pub fn from_form(username: &str, password: &str) -> Result<Self, DomainError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::MissingInput("account fields"));
        }
        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Exact match against trimmed sign-in input.
    #[must_use]
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username.trim() && self.password == password.trim()
    }
}

// Never print the password, not even in debug logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
