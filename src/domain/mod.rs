//! Domain layer: Core clinical-coding types and logic.
//!
//! Pure Rust types with no I/O. Everything the backend hands back is
//! validated here before the application layer acts on it.

mod coding;
mod condition;
mod patient;
mod selection;
mod session;

pub use coding::{Coding, CodingSet, DiagnosisChoice, NAMASTE_AYURVEDA_SYSTEM, TRANSLATION_CODINGS};
pub use condition::{
    override_coding, render_bundle, result_entries, ConditionRequest, ReportRequest, ResultEntry,
    SearchHit, SearchResponse, SelectedCondition, AYURVEDA_SYSTEM, SEARCH_SUCCESS,
};
pub use patient::{NewPatient, PatientResource, BIRTH_DATE_FORMAT};
pub use selection::{CodingPreview, ResultList};
pub use session::{Credentials, CREDENTIALS_KEY, LOGGED_IN_KEY, LOGGED_IN_MARKER};

/// Validation and shape errors raised by domain types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Birth date must be YYYY-MM-DD, got {0:?}")]
    InvalidBirthDate(String),

    #[error("Unexpected coding shape: {0}")]
    CodingShape(String),
}
