//! Disease search results, the pending condition and report payloads.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};

use super::coding::{Coding, NAMASTE_AYURVEDA_SYSTEM};
use super::DomainError;

/// Classification system queried by the dashboard.
pub const AYURVEDA_SYSTEM: &str = "ayurveda";

/// Status value the search endpoint returns when rows matched.
pub const SEARCH_SUCCESS: &str = "success";

/// Response of `GET /search`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// One matched NAMASTE row.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SearchHit {
    #[serde(default, deserialize_with = "lenient_string")]
    pub term: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
}

// Spreadsheet-backed rows may carry numeric codes or nulls.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

/// A selectable line in the results list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Term carried into the selected condition
    pub term: String,
    /// NAMASTE code, absent for the rule-based fallback
    pub code: Option<String>,
    /// Rendered label
    pub label: String,
}

impl ResultEntry {
    #[must_use]
    pub fn matched(term: impl Into<String>, code: impl Into<String>) -> Self {
        let term = term.into();
        let code = code.into();
        Self {
            label: format!("{term} ({code})"),
            term,
            code: Some(code),
        }
    }

    /// Heuristic entry used when the structured lookup yields nothing.
    #[must_use]
    pub fn rule_based(query: impl Into<String>) -> Self {
        let term = query.into();
        Self {
            label: format!("{term} (rule-based)"),
            term,
            code: None,
        }
    }

    #[must_use]
    pub fn is_rule_based(&self) -> bool {
        self.code.is_none()
    }
}

/// Turn a search response into list entries.
///
/// A successful, non-empty response yields one entry per hit; anything else
/// yields exactly one rule-based entry for the query.
#[must_use]
pub fn result_entries(query: &str, response: &SearchResponse) -> Vec<ResultEntry> {
    if response.status == SEARCH_SUCCESS && !response.results.is_empty() {
        return response
            .results
            .iter()
            .map(|hit| {
                ResultEntry::matched(
                    hit.term.clone().unwrap_or_default(),
                    hit.code.clone().unwrap_or_default(),
                )
            })
            .collect();
    }

    vec![ResultEntry::rule_based(query)]
}

/// Condition pending report generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedCondition {
    pub system: String,
    pub term: String,
    pub final_coding: Option<Coding>,
}

impl SelectedCondition {
    #[must_use]
    pub fn ayurveda(term: impl Into<String>) -> Self {
        Self {
            system: AYURVEDA_SYSTEM.to_string(),
            term: term.into(),
            final_coding: None,
        }
    }
}

/// Body of `POST /fhir/condition`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionRequest {
    pub patient_id: Value,
    pub system: String,
    pub term: String,
}

/// Body of `POST /fhir/report`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRequest {
    pub patient: Value,
    pub condition: Value,
}

/// Replace the backend's `code.coding` with the clinician's final selection.
///
/// The result is always `[{system: NAMASTE-AYURVEDA, display: term}, final]`.
///
/// # Errors
/// `DomainError::CodingShape` if the condition (or its `code`) is not a JSON object.
pub fn override_coding(condition: &mut Value, term: &str, final_coding: &Coding) -> Result<(), DomainError> {
    let object = condition
        .as_object_mut()
        .ok_or_else(|| DomainError::CodingShape("condition is not an object".to_string()))?;

    let code = object.entry("code").or_insert_with(|| json!({}));
    let code = code
        .as_object_mut()
        .ok_or_else(|| DomainError::CodingShape("condition.code is not an object".to_string()))?;

    let source = Coding::source(NAMASTE_AYURVEDA_SYSTEM, term);
    let codings = serde_json::to_value(vec![&source, final_coding])
        .map_err(|e| DomainError::CodingShape(e.to_string()))?;
    code.insert("coding".to_string(), codings);
    Ok(())
}

/// Pretty-print a bundle for the output area (two-space indentation).
///
/// # Errors
/// Propagates serializer failures.
pub fn render_bundle(bundle: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(bundle)
}
