//! # AyushDesk
//!
//! Clinician dashboard for coding AYUSH (NAMASTE) diagnoses against
//! ICD-11 TM2 and ICD-11, and producing FHIR bundles.
//!
//! This crate provides:
//! - A local demo account with sign-up, sign-in and a guarded dashboard
//! - Patient registration, disease search and code preview
//! - FHIR Condition and Bundle generation through the terminology service
//! - Terminal UI with transient toast notifications
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (Patient, Coding, search results, credentials)
//! - `ports`: Trait definitions for external operations
//! - `adapters`: Concrete implementations (reqwest, SQLite, log sanitizer)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use config::Config;
pub use domain::{Coding, DiagnosisChoice, NewPatient, PatientResource};

/// Result type for AyushDesk operations
pub type Result<T> = std::result::Result<T, AyushDeskError>;

/// Main error type for AyushDesk
#[derive(Debug, thiserror::Error)]
pub enum AyushDeskError {
    #[error("Invalid input: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("Terminology service error: {0}")]
    Api(#[from] ports::ApiError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] application::AuthError),

    #[error("Dashboard action failed: {0}")]
    Dashboard(#[from] application::DashboardError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
