//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the dashboard and external systems (terminology service, local store).

mod session_store;
mod terminology;

pub use session_store::SessionStore;
pub use terminology::{ApiError, BackendHealth, BundleReceipt, DatasetCounts, TerminologyApi};
