//! Terminology port: Trait for the AYUSH–ICD-11 backend.
//!
//! Abstracts the HTTP service so the dashboard flow can run against the
//! real backend or a scripted stand-in.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::domain::{ConditionRequest, NewPatient, ReportRequest, SearchResponse};

/// Errors talking to the backend.
///
/// The dashboard does not distinguish between these when notifying; the
/// variants exist for logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Cannot reach terminology service at {0}")]
    Connection(String),

    #[error("Terminology service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Malformed response: {0}")]
    Parse(String),
}

/// Dataset sizes reported by the health endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatasetCounts {
    #[serde(default)]
    pub ayurveda: u64,
    #[serde(default)]
    pub siddha: u64,
    #[serde(default)]
    pub unani: u64,
}

/// Response of `GET /`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendHealth {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub datasets_loaded: DatasetCounts,
    #[serde(default)]
    pub errors: BTreeMap<String, String>,
}

impl BackendHealth {
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// Response of `POST /fhir/bundle`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BundleReceipt {
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "resourceType")]
    pub resource_type: String,
}

/// Operations the dashboard needs from the terminology service.
pub trait TerminologyApi: Send + Sync {
    /// Service status and loaded datasets.
    ///
    /// # Errors
    /// Returns error on network failure or malformed response.
    fn health(&self) -> Result<BackendHealth, ApiError>;

    /// Create a FHIR Patient.
    ///
    /// # Errors
    /// Returns error on network failure or malformed response.
    fn create_patient(&self, patient: &NewPatient) -> Result<Value, ApiError>;

    /// Search a code system for a term.
    ///
    /// # Errors
    /// Returns error on network failure or malformed response.
    fn search(&self, term: &str, system: &str) -> Result<SearchResponse, ApiError>;

    /// Translate a term to its TM2 and ICD-11 codings.
    ///
    /// # Errors
    /// Returns error on network failure or malformed response.
    fn translate(&self, system: &str, term: &str) -> Result<Value, ApiError>;

    /// Record a FHIR Condition.
    ///
    /// # Errors
    /// Returns error on network failure or malformed response.
    fn create_condition(&self, request: &ConditionRequest) -> Result<Value, ApiError>;

    /// Assemble a FHIR Bundle from a patient and condition.
    ///
    /// # Errors
    /// Returns error on network failure or malformed response.
    fn generate_report(&self, request: &ReportRequest) -> Result<Value, ApiError>;

    /// Upload a bundle.
    ///
    /// # Errors
    /// Returns error on network failure or malformed response.
    fn upload_bundle(&self, bundle: &Value) -> Result<BundleReceipt, ApiError>;
}
