//! Scripted terminology service for tests.
//!
//! Every endpoint answers with a configured response (or a configured
//! failure) and every call is recorded for inspection.

use std::collections::HashSet;
use std::sync::Mutex;

use serde_json::{json, Value};

use crate::domain::{ConditionRequest, NewPatient, ReportRequest, SearchResponse};
use crate::ports::{ApiError, BackendHealth, BundleReceipt, DatasetCounts, TerminologyApi};

/// Backend endpoints, used to script failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    Patient,
    Search,
    Translate,
    Condition,
    Report,
    Bundle,
}

/// A recorded call with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Health,
    CreatePatient(NewPatient),
    Search { term: String, system: String },
    Translate { system: String, term: String },
    CreateCondition(ConditionRequest),
    GenerateReport(ReportRequest),
    UploadBundle(Value),
}

/// In-process stand-in for the terminology service.
pub struct ScriptedTerminologyApi {
    patient: Value,
    search: SearchResponse,
    translation: Value,
    condition: Value,
    report: Value,
    failing: HashSet<Endpoint>,
    calls: Mutex<Vec<ApiCall>>,
}

impl Default for ScriptedTerminologyApi {
    fn default() -> Self {
        Self {
            patient: json!({"resourceType": "Patient", "id": "patient-001"}),
            search: SearchResponse::default(),
            translation: json!({"code": {"coding": []}}),
            condition: json!({"resourceType": "Condition", "code": {"coding": []}}),
            report: json!({"resourceType": "Bundle", "type": "collection", "entry": []}),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedTerminologyApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_patient(mut self, patient: Value) -> Self {
        self.patient = patient;
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: SearchResponse) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Value) -> Self {
        self.translation = translation;
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Value) -> Self {
        self.condition = condition;
        self
    }

    #[must_use]
    pub fn with_report(mut self, report: Value) -> Self {
        self.report = report;
        self
    }

    /// Make `endpoint` fail with a connection error.
    #[must_use]
    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failing.insert(endpoint);
        self
    }

    /// Calls received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().expect("Lock failed").clone()
    }

    fn record(&self, endpoint: Endpoint, call: ApiCall) -> Result<(), ApiError> {
        self.calls.lock().expect("Lock failed").push(call);
        if self.failing.contains(&endpoint) {
            return Err(ApiError::Connection("scripted".to_string()));
        }
        Ok(())
    }
}

impl TerminologyApi for ScriptedTerminologyApi {
    fn health(&self) -> Result<BackendHealth, ApiError> {
        self.record(Endpoint::Health, ApiCall::Health)?;
        Ok(BackendHealth {
            status: "running".to_string(),
            datasets_loaded: DatasetCounts {
                ayurveda: 1,
                siddha: 0,
                unani: 0,
            },
            errors: Default::default(),
        })
    }

    fn create_patient(&self, patient: &NewPatient) -> Result<Value, ApiError> {
        self.record(Endpoint::Patient, ApiCall::CreatePatient(patient.clone()))?;
        Ok(self.patient.clone())
    }

    fn search(&self, term: &str, system: &str) -> Result<SearchResponse, ApiError> {
        self.record(
            Endpoint::Search,
            ApiCall::Search {
                term: term.to_string(),
                system: system.to_string(),
            },
        )?;
        Ok(self.search.clone())
    }

    fn translate(&self, system: &str, term: &str) -> Result<Value, ApiError> {
        self.record(
            Endpoint::Translate,
            ApiCall::Translate {
                system: system.to_string(),
                term: term.to_string(),
            },
        )?;
        Ok(self.translation.clone())
    }

    fn create_condition(&self, request: &ConditionRequest) -> Result<Value, ApiError> {
        self.record(Endpoint::Condition, ApiCall::CreateCondition(request.clone()))?;
        Ok(self.condition.clone())
    }

    fn generate_report(&self, request: &ReportRequest) -> Result<Value, ApiError> {
        self.record(Endpoint::Report, ApiCall::GenerateReport(request.clone()))?;
        Ok(self.report.clone())
    }

    fn upload_bundle(&self, bundle: &Value) -> Result<BundleReceipt, ApiError> {
        self.record(Endpoint::Bundle, ApiCall::UploadBundle(bundle.clone()))?;
        Ok(BundleReceipt {
            status: "bundle received".to_string(),
            resource_type: bundle
                .get("resourceType")
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string(),
        })
    }
}
