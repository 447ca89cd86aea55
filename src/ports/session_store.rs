//! Session store port: persistent key-value storage for the demo account.
//!
//! Mirrors the shape of a browser's `localStorage`: string values under
//! string keys, nothing else.

/// Trait for the local key-value store.
pub trait SessionStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// `None` if the key is absent.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn get_item(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn set_item(&self, key: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns error if the storage operation fails.
    fn remove_item(&self, key: &str) -> Result<(), Self::Error>;
}
