//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `http`: reqwest client for the terminology service
//! - `sqlite`: SQLite for the local session store
//! - `mock`: scripted terminology service (test builds only)
//! - `sanitize`: credential/PII filtering for logs

pub mod http;
#[cfg(test)]
pub mod mock;
pub mod sanitize;
pub mod sqlite;

pub use http::HttpTerminologyClient;
pub use sqlite::{SqliteSessionStore, StorageError};
