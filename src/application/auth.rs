//! Auth service: Sign-up, sign-in, logout and the dashboard route guard.
//!
//! Backed by the local session store only. Credentials are compared in
//! plaintext; there is no server-side verification.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Credentials, CREDENTIALS_KEY, LOGGED_IN_KEY, LOGGED_IN_MARKER};
use crate::ports::SessionStore;

/// Delay before leaving the sign-up or sign-in screen.
pub const AUTH_REDIRECT_DELAY: Duration = Duration::from_millis(1200);

/// Delay before leaving the dashboard after logout.
pub const LOGOUT_REDIRECT_DELAY: Duration = Duration::from_millis(800);

/// Screens the auth flow can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Sign-in screen
    Landing,
    /// Protected dashboard
    Dashboard,
}

/// A navigation scheduled after a short delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub route: Route,
    pub delay: Duration,
}

/// Successful auth action: a toast and where to go next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub message: &'static str,
    pub navigation: Navigation,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Please fill all fields")]
    MissingFields,

    #[error("No account found. Please sign up first")]
    NoAccount,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Session store failure: {0}")]
    Storage(String),
}

impl AuthError {
    /// Toast text for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Storage(_) => "Could not access local account storage".to_string(),
            other => other.to_string(),
        }
    }
}

/// Service for the local demo account.
pub struct AuthService<S: SessionStore> {
    store: Arc<S>,
}

impl<S: SessionStore> AuthService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create (or overwrite) the single stored account.
    ///
    /// # Errors
    /// `AuthError::MissingFields` if either field is blank after trimming.
    pub fn signup(&self, username: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let credentials = Credentials::from_form(username, password).map_err(|_| AuthError::MissingFields)?;

        let json = serde_json::to_string(&credentials).map_err(|e| AuthError::Storage(e.to_string()))?;
        self.store
            .set_item(CREDENTIALS_KEY, &json)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        tracing::info!(username = %credentials.username, "Account created");
        Ok(AuthOutcome {
            message: "Account created successfully",
            navigation: Navigation {
                route: Route::Landing,
                delay: AUTH_REDIRECT_DELAY,
            },
        })
    }

    /// Compare input against the stored account and set the login flag.
    ///
    /// # Errors
    /// `AuthError::NoAccount` if nothing was ever signed up,
    /// `AuthError::InvalidCredentials` on mismatch.
    pub fn signin(&self, username: &str, password: &str) -> Result<AuthOutcome, AuthError> {
        let saved = self.load_credentials()?.ok_or(AuthError::NoAccount)?;

        if !saved.matches(username, password) {
            tracing::info!("Sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }

        self.store
            .set_item(LOGGED_IN_KEY, LOGGED_IN_MARKER)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        tracing::info!(username = %saved.username, "Signed in");
        Ok(AuthOutcome {
            message: "Logged in successfully",
            navigation: Navigation {
                route: Route::Dashboard,
                delay: AUTH_REDIRECT_DELAY,
            },
        })
    }

    /// Route guard for the dashboard.
    ///
    /// Returns the redirect target when the login flag is absent or not
    /// exactly the signed-in marker.
    #[must_use]
    pub fn check_auth(&self) -> Option<Route> {
        if self.is_logged_in() {
            None
        } else {
            Some(Route::Landing)
        }
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        match self.store.get_item(LOGGED_IN_KEY) {
            Ok(flag) => flag.as_deref() == Some(LOGGED_IN_MARKER),
            Err(e) => {
                tracing::warn!("Cannot read login flag: {}", e);
                false
            }
        }
    }

    /// Clear the login flag.
    ///
    /// # Errors
    /// `AuthError::Storage` if the flag cannot be removed.
    pub fn logout(&self) -> Result<AuthOutcome, AuthError> {
        self.store
            .remove_item(LOGGED_IN_KEY)
            .map_err(|e| AuthError::Storage(e.to_string()))?;

        tracing::info!("Logged out");
        Ok(AuthOutcome {
            message: "Logged out",
            navigation: Navigation {
                route: Route::Landing,
                delay: LOGOUT_REDIRECT_DELAY,
            },
        })
    }

    fn load_credentials(&self) -> Result<Option<Credentials>, AuthError> {
        let Some(raw) = self
            .store
            .get_item(CREDENTIALS_KEY)
            .map_err(|e| AuthError::Storage(e.to_string()))?
        else {
            return Ok(None);
        };

        match serde_json::from_str::<Credentials>(&raw) {
            Ok(credentials) => Ok(Some(credentials)),
            Err(e) => {
                tracing::warn!("Stored account is unreadable, treating as absent: {}", e);
                Ok(None)
            }
        }
    }
}
