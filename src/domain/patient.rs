//! Patient demographics sent to the backend and the resource it returns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DomainError;

/// Date format accepted for the birth date field.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Body of `POST /fhir/patient`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub gender: String,
    #[serde(rename = "birthDate")]
    pub birth_date: String,
}

impl NewPatient {
    /// Validate raw form input.
    ///
    /// Name and gender are trimmed; the birth date must be present and parse
    /// as `YYYY-MM-DD`.
    ///
    /// # Errors
    /// `DomainError::MissingInput` if any field is empty,
    /// `DomainError::InvalidBirthDate` if the date does not parse.
    pub fn from_form(name: &str, gender: &str, birth_date: &str) -> Result<Self, DomainError> {
        let name = name.trim();
        let gender = gender.trim();

        if name.is_empty() || gender.is_empty() || birth_date.is_empty() {
            return Err(DomainError::MissingInput("patient details"));
        }

        let birth_date = birth_date.trim();
        NaiveDate::parse_from_str(birth_date, BIRTH_DATE_FORMAT)
            .map_err(|_| DomainError::InvalidBirthDate(birth_date.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            gender: gender.to_string(),
            birth_date: birth_date.to_string(),
        })
    }
}

/// Opaque FHIR Patient returned by the backend, kept in memory only.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientResource(pub Value);

impl PatientResource {
    /// Resource id, used as `patient_id` when recording a condition.
    ///
    /// A missing id is sent as `null`, the same as the browser client did.
    #[must_use]
    pub fn id(&self) -> Value {
        self.0.get("id").cloned().unwrap_or(Value::Null)
    }

    /// Human-readable name for the dashboard, if the resource carries one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.0
            .get("name")
            .and_then(|names| names.get(0))
            .and_then(|name| name.get("text"))
            .and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_form_trims_and_serializes_birth_date() {
        let patient = NewPatient::from_form("  Asha  ", " female ", "1990-04-12").expect("Should parse");
        assert_eq!(patient.name, "Asha");
        assert_eq!(patient.gender, "female");

        let body = serde_json::to_value(&patient).expect("Should serialize");
        assert_eq!(body, json!({"name": "Asha", "gender": "female", "birthDate": "1990-04-12"}));
    }

    #[test]
    fn test_from_form_rejects_blank_fields() {
        for (name, gender, dob) in [("   ", "male", "1990-01-01"), ("Ravi", " ", "1990-01-01"), ("Ravi", "male", "")] {
            let err = NewPatient::from_form(name, gender, dob).expect_err("Should reject");
            assert!(matches!(err, DomainError::MissingInput(_)));
        }
    }

    #[test]
    fn test_from_form_rejects_malformed_date() {
        let err = NewPatient::from_form("Ravi", "male", "12/04/1990").expect_err("Should reject");
        assert!(matches!(err, DomainError::InvalidBirthDate(_)));
    }

    #[test]
    fn test_resource_id_and_name() {
        let resource = PatientResource(json!({
            "resourceType": "Patient",
            "id": "patient-001",
            "name": [{"use": "official", "text": "Asha"}]
        }));
        assert_eq!(resource.id(), json!("patient-001"));
        assert_eq!(resource.display_name(), Some("Asha"));

        let bare = PatientResource(json!({}));
        assert_eq!(bare.id(), Value::Null);
        assert_eq!(bare.display_name(), None);
    }
}
