//! HTTP adapter: Implementation of TerminologyApi over the backend's REST API.
//!
//! Uses the blocking `reqwest` client; calls are issued from the background
//! worker thread, never from the render loop.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ConditionRequest, NewPatient, ReportRequest, SearchResponse};
use crate::ports::{ApiError, BackendHealth, BundleReceipt, TerminologyApi};

/// Default backend address for local deployments.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Terminology service client.
pub struct HttpTerminologyClient {
    base_url: String,
    client: Client,
}

impl HttpTerminologyClient {
    /// Create a client for `base_url`.
    ///
    /// With `timeout` of `None` a request waits for the backend indefinitely.
    ///
    /// # Errors
    /// Returns `ApiError::Http` if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn execute(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        request.send().map_err(|e| {
            if e.is_connect() {
                ApiError::Connection(self.base_url.clone())
            } else {
                ApiError::Http(e.to_string())
            }
        })
    }

    fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.execute(request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().map_err(|e| ApiError::Parse(e.to_string()))
    }
}

impl TerminologyApi for HttpTerminologyClient {
    fn health(&self) -> Result<BackendHealth, ApiError> {
        self.send(self.client.get(self.url("/")))
    }

    fn create_patient(&self, patient: &NewPatient) -> Result<Value, ApiError> {
        tracing::debug!("POST /fhir/patient");
        self.send(self.client.post(self.url("/fhir/patient")).json(patient))
    }

    /// A rejected query (e.g. 422 for a too-short term) still yields a
    /// response when the body is JSON; its missing `status` makes the
    /// dashboard fall back to a rule-based entry.
    fn search(&self, term: &str, system: &str) -> Result<SearchResponse, ApiError> {
        tracing::debug!(system, "GET /search");
        let response = self.execute(
            self.client
                .get(self.url("/search"))
                .query(&[("term", term), ("system", system)]),
        )?;

        let status = response.status();
        if status.is_success() {
            return response.json().map_err(|e| ApiError::Parse(e.to_string()));
        }

        let body = response.text().unwrap_or_default();
        match serde_json::from_str::<SearchResponse>(&body) {
            Ok(rejected) => {
                tracing::info!(status = status.as_u16(), "Search rejected by backend");
                Ok(rejected)
            }
            Err(_) => Err(ApiError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }

    fn translate(&self, system: &str, term: &str) -> Result<Value, ApiError> {
        tracing::debug!(system, "GET /translate");
        self.send(
            self.client
                .get(self.url("/translate"))
                .query(&[("system", system), ("term", term)]),
        )
    }

    fn create_condition(&self, request: &ConditionRequest) -> Result<Value, ApiError> {
        tracing::debug!("POST /fhir/condition");
        self.send(self.client.post(self.url("/fhir/condition")).json(request))
    }

    fn generate_report(&self, request: &ReportRequest) -> Result<Value, ApiError> {
        tracing::debug!("POST /fhir/report");
        self.send(self.client.post(self.url("/fhir/report")).json(request))
    }

    fn upload_bundle(&self, bundle: &Value) -> Result<BundleReceipt, ApiError> {
        tracing::debug!("POST /fhir/bundle");
        self.send(self.client.post(self.url("/fhir/bundle")).json(bundle))
    }
}
