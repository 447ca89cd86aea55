//! Coding types for the NAMASTE → ICD-11 TM2 → ICD-11 translation.
//!
//! The terminology service answers a translation with a three-entry coding
//! list at fixed positions: the recorded NAMASTE term, the traditional
//! medicine (TM2) disorder and the biomedical (ICD-11) interpretation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DomainError;

/// Code system label for the synthesized source coding in reports.
pub const NAMASTE_AYURVEDA_SYSTEM: &str = "NAMASTE-AYURVEDA";

/// Number of codings a translation must carry.
pub const TRANSLATION_CODINGS: usize = 3;

/// A single `{system, code, display}` entry.
///
/// Fields the backend adds beyond these (e.g. `mappingType`) are kept in
/// `extra` so the coding can be echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Coding {
    /// Source-system coding carrying only a display term.
    #[must_use]
    pub fn source(system: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            system: Some(system.into()),
            code: None,
            display: Some(display.into()),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn code_or_blank(&self) -> &str {
        self.code.as_deref().unwrap_or("")
    }

    #[must_use]
    pub fn display_or_blank(&self) -> &str {
        self.display.as_deref().unwrap_or("")
    }
}

/// Which interpretation the clinician picked for the final diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosisChoice {
    /// Traditional disorder (ICD-11 TM2), translation index 1
    Traditional,
    /// Non-specific symptom (ICD-11), translation index 2
    Biomedical,
}

impl DiagnosisChoice {
    /// The option that gets hidden once this one is chosen.
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Traditional => Self::Biomedical,
            Self::Biomedical => Self::Traditional,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Traditional => "Traditional disorder (TM2)",
            Self::Biomedical => "Non-specific symptom (ICD-11)",
        }
    }
}

/// Validated translation result.
#[derive(Debug, Clone, PartialEq)]
pub struct CodingSet {
    pub source: Coding,
    pub traditional: Coding,
    pub biomedical: Coding,
}

impl CodingSet {
    /// Build from the raw coding list, requiring the three fixed positions.
    ///
    /// # Errors
    /// Returns `DomainError::CodingShape` if fewer than three codings are present.
    pub fn from_codings(codings: Vec<Coding>) -> Result<Self, DomainError> {
        if codings.len() < TRANSLATION_CODINGS {
            return Err(DomainError::CodingShape(format!(
                "expected {TRANSLATION_CODINGS} codings, got {}",
                codings.len()
            )));
        }

        let mut it = codings.into_iter();
        match (it.next(), it.next(), it.next()) {
            (Some(source), Some(traditional), Some(biomedical)) => Ok(Self {
                source,
                traditional,
                biomedical,
            }),
            _ => Err(DomainError::CodingShape("coding list truncated".to_string())),
        }
    }

    /// Extract `code.coding` from a translate response.
    ///
    /// # Errors
    /// Returns `DomainError::CodingShape` if the path is missing, malformed or short.
    pub fn from_translation(response: &Value) -> Result<Self, DomainError> {
        let raw = response
            .get("code")
            .and_then(|code| code.get("coding"))
            .ok_or_else(|| DomainError::CodingShape("response has no code.coding".to_string()))?;

        let codings: Vec<Coding> = serde_json::from_value(raw.clone())
            .map_err(|e| DomainError::CodingShape(format!("code.coding is not a coding list: {e}")))?;

        Self::from_codings(codings)
    }

    #[must_use]
    pub fn get(&self, choice: DiagnosisChoice) -> &Coding {
        match choice {
            DiagnosisChoice::Traditional => &self.traditional,
            DiagnosisChoice::Biomedical => &self.biomedical,
        }
    }
}
