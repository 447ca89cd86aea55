//! Dashboard flow: patient → disease search → code preview → FHIR report.
//!
//! All flow state lives in [`DashboardState`], owned by the UI thread.
//! A user action turns into a [`Job`] (validation and preconditions are
//! checked first, so a refused action never reaches the backend). Jobs run
//! against the [`TerminologyApi`] via [`run_job`], normally on the
//! background worker, and their result is folded back with
//! [`DashboardState::complete`].

use serde_json::Value;

use crate::domain::{
    override_coding, render_bundle, result_entries, Coding, CodingPreview, CodingSet, ConditionRequest,
    DiagnosisChoice, DomainError, NewPatient, PatientResource, ReportRequest, ResultList, SearchResponse,
    SelectedCondition, AYURVEDA_SYSTEM,
};
use crate::ports::{ApiError, BackendHealth, BundleReceipt, TerminologyApi};

/// Errors raised by dashboard actions.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Missing or malformed input; the message is shown as-is.
    #[error("{0}")]
    Validation(&'static str),

    /// Action taken out of order; the message is shown as-is.
    #[error("{0}")]
    Precondition(&'static str),

    #[error("Request already in progress")]
    Busy,

    #[error("Backend request failed: {0}")]
    Api(#[from] ApiError),

    #[error("Unexpected response: {0}")]
    Shape(#[from] DomainError),

    #[error("Cannot render bundle: {0}")]
    Render(#[from] serde_json::Error),
}

impl DashboardError {
    /// Toast text for this error raised while handling `kind`.
    #[must_use]
    pub fn user_message(&self, kind: JobKind) -> String {
        match self {
            Self::Validation(msg) | Self::Precondition(msg) => (*msg).to_string(),
            Self::Busy => self.to_string(),
            Self::Api(_) | Self::Shape(_) | Self::Render(_) => kind.failure_message().to_string(),
        }
    }
}

/// Backend request categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Health,
    CreatePatient,
    Search,
    Preview,
    Report,
    Upload,
}

impl JobKind {
    /// Generic failure toast for network and parse errors.
    #[must_use]
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Health => "Backend unreachable",
            Self::CreatePatient => "Error creating patient",
            Self::Search => "Error searching disease",
            Self::Preview => "Error loading code preview",
            Self::Report => "Error generating FHIR bundle",
            Self::Upload => "Error uploading FHIR bundle",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Health => "Checking backend",
            Self::CreatePatient => "Creating patient",
            Self::Search => "Searching NAMASTE codes",
            Self::Preview => "Loading code preview",
            Self::Report => "Generating FHIR bundle",
            Self::Upload => "Uploading bundle",
        }
    }
}

/// A backend request ready to run.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    CheckHealth,
    CreatePatient(NewPatient),
    Search { query: String },
    Preview { term: String },
    Report {
        patient: PatientResource,
        term: String,
        system: String,
        final_coding: Coding,
    },
    Upload(Value),
}

impl Job {
    #[must_use]
    pub fn kind(&self) -> JobKind {
        match self {
            Self::CheckHealth => JobKind::Health,
            Self::CreatePatient(_) => JobKind::CreatePatient,
            Self::Search { .. } => JobKind::Search,
            Self::Preview { .. } => JobKind::Preview,
            Self::Report { .. } => JobKind::Report,
            Self::Upload(_) => JobKind::Upload,
        }
    }
}

/// Intermediate steps of report generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportStep {
    RecordingCondition,
    AssemblingBundle,
}

/// What a finished job hands back to the state.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Health(BackendHealth),
    PatientCreated(Value),
    SearchCompleted { query: String, response: SearchResponse },
    PreviewLoaded { term: String, translation: Value },
    ReportGenerated(Value),
    BundleUploaded(BundleReceipt),
}

/// Execute `job` against the backend.
///
/// `on_step` is called as report generation moves between its requests.
///
/// # Errors
/// Any failed request or malformed response aborts the job.
pub fn run_job<A>(api: &A, job: Job, on_step: &mut dyn FnMut(ReportStep)) -> Result<JobOutcome, DashboardError>
where
    A: TerminologyApi + ?Sized,
{
    match job {
        Job::CheckHealth => Ok(JobOutcome::Health(api.health()?)),
        Job::CreatePatient(patient) => Ok(JobOutcome::PatientCreated(api.create_patient(&patient)?)),
        Job::Search { query } => {
            let response = api.search(&query, AYURVEDA_SYSTEM)?;
            Ok(JobOutcome::SearchCompleted { query, response })
        }
        Job::Preview { term } => {
            let translation = api.translate(AYURVEDA_SYSTEM, &term)?;
            Ok(JobOutcome::PreviewLoaded { term, translation })
        }
        Job::Report {
            patient,
            term,
            system,
            final_coding,
        } => {
            on_step(ReportStep::RecordingCondition);
            let mut condition = api.create_condition(&ConditionRequest {
                patient_id: patient.id(),
                system,
                term: term.clone(),
            })?;

            override_coding(&mut condition, &term, &final_coding)?;

            on_step(ReportStep::AssemblingBundle);
            let bundle = api.generate_report(&ReportRequest {
                patient: patient.0,
                condition,
            })?;
            Ok(JobOutcome::ReportGenerated(bundle))
        }
        Job::Upload(bundle) => Ok(JobOutcome::BundleUploaded(api.upload_bundle(&bundle)?)),
    }
}

/// Last known backend status.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Up(BackendHealth),
    Down,
}

/// Everything the dashboard screen shows and acts on.
#[derive(Debug, Default)]
pub struct DashboardState {
    patient: Option<PatientResource>,
    results: ResultList,
    selected: Option<SelectedCondition>,
    preview: Option<CodingPreview>,
    report_output: Option<String>,
    last_bundle: Option<Value>,
    backend: BackendStatus,
    in_flight: Option<JobKind>,
    // Health checks run beside user actions, one at a time.
    health_check_running: bool,
}

impl DashboardState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Read access for rendering ===

    #[must_use]
    pub fn patient(&self) -> Option<&PatientResource> {
        self.patient.as_ref()
    }

    #[must_use]
    pub fn results(&self) -> &ResultList {
        &self.results
    }

    #[must_use]
    pub fn selected_condition(&self) -> Option<&SelectedCondition> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn preview(&self) -> Option<&CodingPreview> {
        self.preview.as_ref()
    }

    #[must_use]
    pub fn report_output(&self) -> Option<&str> {
        self.report_output.as_deref()
    }

    #[must_use]
    pub fn backend(&self) -> &BackendStatus {
        &self.backend
    }

    #[must_use]
    pub fn in_flight(&self) -> Option<JobKind> {
        self.in_flight
    }

    // === Actions ===

    /// Start a backend health check.
    ///
    /// Health checks do not take the busy slot, so a hung check never
    /// blocks patient, search or report actions.
    ///
    /// # Errors
    /// `Busy` if a health check is already running.
    pub fn request_health(&mut self) -> Result<Job, DashboardError> {
        if self.health_check_running {
            return Err(DashboardError::Busy);
        }
        self.health_check_running = true;
        Ok(Job::CheckHealth)
    }

    /// Validate the patient form.
    ///
    /// # Errors
    /// `Validation` on blank fields or a malformed birth date, `Busy` if a
    /// request is running.
    pub fn request_create_patient(&mut self, name: &str, gender: &str, birth_date: &str) -> Result<Job, DashboardError> {
        let patient = NewPatient::from_form(name, gender, birth_date).map_err(|e| match e {
            DomainError::InvalidBirthDate(_) => DashboardError::Validation("Birth date must be YYYY-MM-DD"),
            _ => DashboardError::Validation("Fill all patient details"),
        })?;
        self.start(Job::CreatePatient(patient))
    }

    /// Start a disease search, clearing the previous results and selection.
    ///
    /// # Errors
    /// `Validation` on a blank query, `Busy` if a request is running.
    pub fn request_search(&mut self, query: &str) -> Result<Job, DashboardError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DashboardError::Validation("Enter disease to search"));
        }
        let job = self.start(Job::Search {
            query: query.to_string(),
        })?;

        self.results = ResultList::default();
        self.selected = None;
        self.preview = None;
        Ok(job)
    }

    /// Select a result entry and request its code preview.
    ///
    /// Returns `Ok(None)` when the entry is hidden or does not exist.
    ///
    /// # Errors
    /// `Busy` if a request is running.
    pub fn select_result(&mut self, index: usize) -> Result<Option<Job>, DashboardError> {
        if self.in_flight.is_some() {
            return Err(DashboardError::Busy);
        }
        let Some(entry) = self.results.select(index) else {
            return Ok(None);
        };

        let term = entry.term.clone();
        self.selected = Some(SelectedCondition::ayurveda(term.clone()));
        self.preview = None;
        self.start(Job::Preview { term }).map(Some)
    }

    /// Pick one of the two interpretations as the final coding.
    ///
    /// Returns the chosen coding, or `None` if no preview is loaded or the
    /// option is hidden.
    pub fn choose_coding(&mut self, choice: DiagnosisChoice) -> Option<&Coding> {
        let preview = self.preview.as_mut()?;
        let selected = self.selected.as_mut()?;
        let coding = preview.choose(choice)?.clone();

        tracing::info!(choice = ?choice, code = coding.code_or_blank(), "Diagnosis interpretation chosen");
        selected.final_coding = Some(coding);
        selected.final_coding.as_ref()
    }

    /// Check preconditions for report generation.
    ///
    /// # Errors
    /// `Precondition` without a patient or a final coding, `Busy` if a
    /// request is running.
    pub fn request_report(&mut self) -> Result<Job, DashboardError> {
        let (Some(patient), Some(selected)) = (self.patient.as_ref(), self.selected.as_ref()) else {
            return Err(DashboardError::Precondition("Select patient and diagnosis interpretation"));
        };
        let Some(final_coding) = selected.final_coding.clone() else {
            return Err(DashboardError::Precondition("Select patient and diagnosis interpretation"));
        };

        let job = Job::Report {
            patient: patient.clone(),
            term: selected.term.clone(),
            system: selected.system.clone(),
            final_coding,
        };
        self.start(job)
    }

    /// Upload the last generated bundle.
    ///
    /// # Errors
    /// `Precondition` if no report has been generated, `Busy` if a request
    /// is running.
    pub fn request_upload(&mut self) -> Result<Job, DashboardError> {
        let bundle = self
            .last_bundle
            .clone()
            .ok_or(DashboardError::Precondition("Generate a report first"))?;
        self.start(Job::Upload(bundle))
    }

    fn start(&mut self, job: Job) -> Result<Job, DashboardError> {
        if self.in_flight.is_some() {
            return Err(DashboardError::Busy);
        }
        self.in_flight = Some(job.kind());
        Ok(job)
    }

    /// Fold a finished job back into the state.
    ///
    /// Returns the toast to show, if any. On failure the state is left as
    /// it was before the result arrived.
    pub fn complete(&mut self, kind: JobKind, result: Result<JobOutcome, DashboardError>) -> Option<String> {
        if kind == JobKind::Health {
            self.health_check_running = false;
        } else if self.in_flight == Some(kind) {
            self.in_flight = None;
        }

        match result.and_then(|outcome| self.apply(outcome)) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(job = ?kind, "Request failed: {}", e);
                if kind == JobKind::Health {
                    self.backend = BackendStatus::Down;
                }
                Some(e.user_message(kind))
            }
        }
    }

    fn apply(&mut self, outcome: JobOutcome) -> Result<Option<String>, DashboardError> {
        match outcome {
            JobOutcome::Health(health) => {
                self.backend = BackendStatus::Up(health);
                Ok(None)
            }
            JobOutcome::PatientCreated(resource) => {
                self.patient = Some(PatientResource(resource));
                Ok(Some("Patient created successfully".to_string()))
            }
            JobOutcome::SearchCompleted { query, response } => {
                let entries = result_entries(&query, &response);
                tracing::info!(count = entries.len(), status = %response.status, "Search completed");
                self.results = ResultList::new(entries);
                Ok(None)
            }
            JobOutcome::PreviewLoaded { term, translation } => {
                if self.selected.as_ref().map(|s| s.term.as_str()) != Some(term.as_str()) {
                    tracing::debug!("Discarding preview for a condition no longer selected");
                    return Ok(None);
                }
                let set = CodingSet::from_translation(&translation)?;
                self.preview = Some(CodingPreview::new(term, set));
                Ok(None)
            }
            JobOutcome::ReportGenerated(bundle) => {
                let text = render_bundle(&bundle)?;
                self.report_output = Some(text);
                self.last_bundle = Some(bundle);
                Ok(Some("FHIR bundle generated successfully".to_string()))
            }
            JobOutcome::BundleUploaded(receipt) => Ok(Some(format!("Bundle uploaded: {}", receipt.status))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{ApiCall, Endpoint, ScriptedTerminologyApi};
    use crate::domain::SearchHit;
    use serde_json::json;

    /// Run a requested job synchronously and fold the result back.
    fn execute(state: &mut DashboardState, api: &ScriptedTerminologyApi, job: Job) -> Option<String> {
        let kind = job.kind();
        let result = run_job(api, job, &mut |_| {});
        state.complete(kind, result)
    }

    fn translation() -> Value {
        json!({
            "resourceType": "Condition",
            "code": {"coding": [
                {"system": "NAMASTE-AYURVEDA", "display": "cold", "mappingType": "recorded"},
                {"system": "ICD-11-TM2", "code": "TM2-GEN", "display": "General traditional medicine disorder", "mappingType": "rule-based"},
                {"system": "ICD-11", "code": "ZZ00", "display": "Condition not elsewhere classified", "mappingType": "suggested"}
            ]}
        })
    }

    fn jwara_search() -> SearchResponse {
        SearchResponse {
            status: "success".to_string(),
            results: vec![
                SearchHit {
                    term: Some("Jwara".to_string()),
                    code: Some("AY12".to_string()),
                },
                SearchHit {
                    term: Some("Jirna Jwara".to_string()),
                    code: Some("AY13".to_string()),
                },
            ],
        }
    }

    fn api() -> ScriptedTerminologyApi {
        ScriptedTerminologyApi::new()
            .with_patient(json!({"resourceType": "Patient", "id": "patient-001", "name": [{"text": "Asha"}]}))
            .with_translation(translation())
    }

    #[test]
    fn test_blank_patient_fields_send_nothing() {
        let api = api();
        let mut state = DashboardState::new();

        let err = state.request_create_patient("  ", "female", "1990-01-01").expect_err("Should reject");
        assert_eq!(err.user_message(JobKind::CreatePatient), "Fill all patient details");
        let err = state.request_create_patient("Asha", "female", "").expect_err("Should reject");
        assert_eq!(err.user_message(JobKind::CreatePatient), "Fill all patient details");

        assert!(state.in_flight().is_none());
        assert!(api.calls().is_empty());
    }

    #[test]
    fn test_malformed_birth_date_is_rejected() {
        let mut state = DashboardState::new();
        let err = state.request_create_patient("Asha", "female", "1990/01/01").expect_err("Should reject");
        assert_eq!(err.user_message(JobKind::CreatePatient), "Birth date must be YYYY-MM-DD");
    }

    #[test]
    fn test_create_patient_stores_resource() {
        let api = api();
        let mut state = DashboardState::new();

        let job = state.request_create_patient(" Asha ", "female", "1990-04-12").expect("Should validate");
        assert_eq!(state.in_flight(), Some(JobKind::CreatePatient));

        let toast = execute(&mut state, &api, job);
        assert_eq!(toast.as_deref(), Some("Patient created successfully"));
        assert_eq!(state.patient().map(PatientResource::id), Some(json!("patient-001")));
        assert!(state.in_flight().is_none());
        assert_eq!(
            api.calls(),
            vec![ApiCall::CreatePatient(NewPatient {
                name: "Asha".to_string(),
                gender: "female".to_string(),
                birth_date: "1990-04-12".to_string(),
            })]
        );
    }

    #[test]
    fn test_failed_patient_keeps_previous_resource() {
        let mut state = DashboardState::new();
        let job = state.request_create_patient("Asha", "female", "1990-04-12").expect("Should validate");
        execute(&mut state, &api(), job);

        let failing = api().failing(Endpoint::Patient);
        let job = state.request_create_patient("Ravi", "male", "1985-02-01").expect("Should validate");
        let toast = execute(&mut state, &failing, job);

        assert_eq!(toast.as_deref(), Some("Error creating patient"));
        assert_eq!(state.patient().and_then(PatientResource::display_name), Some("Asha"));
    }

    #[test]
    fn test_blank_query_sends_nothing() {
        let mut state = DashboardState::new();
        let err = state.request_search("   ").expect_err("Should reject");
        assert_eq!(err.user_message(JobKind::Search), "Enter disease to search");
    }

    #[test]
    fn test_one_character_query_falls_back_to_rule_based() {
        // The backend rejects short terms with a body that has no `status`.
        let api = api().with_search(SearchResponse::default());
        let mut state = DashboardState::new();

        let job = state.request_search("a").expect("Should validate");
        assert!(execute(&mut state, &api, job).is_none());

        let labels: Vec<&str> = state.results().entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["a (rule-based)"]);
    }

    #[test]
    fn test_search_renders_results() {
        let api = api().with_search(jwara_search());
        let mut state = DashboardState::new();

        let job = state.request_search(" jwara ").expect("Should validate");
        assert!(execute(&mut state, &api, job).is_none());

        let labels: Vec<&str> = state.results().entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Jwara (AY12)", "Jirna Jwara (AY13)"]);
        assert_eq!(
            api.calls(),
            vec![ApiCall::Search {
                term: "jwara".to_string(),
                system: "ayurveda".to_string()
            }]
        );
    }

    #[test]
    fn test_new_search_clears_selection_and_preview() {
        let api = api().with_search(jwara_search());
        let mut state = DashboardState::new();

        let job = state.request_search("jwara").expect("Should validate");
        execute(&mut state, &api, job);
        let job = state.select_result(0).expect("Not busy").expect("Should select");
        execute(&mut state, &api, job);
        assert!(state.preview().is_some());

        let _job = state.request_search("kasa").expect("Should validate");
        assert!(state.results().is_empty());
        assert!(state.selected_condition().is_none());
        assert!(state.preview().is_none());
    }

    #[test]
    fn test_failed_search_notifies_generic_error() {
        let api = api().failing(Endpoint::Search);
        let mut state = DashboardState::new();

        let job = state.request_search("jwara").expect("Should validate");
        assert_eq!(execute(&mut state, &api, job).as_deref(), Some("Error searching disease"));
        assert!(state.results().is_empty());
    }

    #[test]
    fn test_select_result_sets_pending_condition() {
        let api = api().with_search(jwara_search());
        let mut state = DashboardState::new();

        let job = state.request_search("jwara").expect("Should validate");
        execute(&mut state, &api, job);

        let job = state.select_result(1).expect("Not busy").expect("Should select");
        assert_eq!(job, Job::Preview { term: "Jirna Jwara".to_string() });

        let selected = state.selected_condition().expect("Should be selected");
        assert_eq!(selected.term, "Jirna Jwara");
        assert_eq!(selected.system, "ayurveda");
        assert!(selected.final_coding.is_none());

        let visible: Vec<usize> = state.results().visible().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![1]);
    }

    #[test]
    fn test_busy_state_refuses_new_requests() {
        let mut state = DashboardState::new();
        let _search = state.request_search("jwara").expect("Should validate");

        let err = state.request_search("kasa").expect_err("Should be busy");
        assert!(matches!(err, DashboardError::Busy));
        assert_eq!(err.user_message(JobKind::Search), "Request already in progress");
        assert!(matches!(state.select_result(0), Err(DashboardError::Busy)));
    }

    #[test]
    fn test_health_check_runs_beside_user_actions() {
        let api = api().with_search(jwara_search());
        let mut state = DashboardState::new();

        let health = state.request_health().expect("Should start");
        assert!(state.in_flight().is_none());
        assert!(matches!(state.request_health(), Err(DashboardError::Busy)));

        let search = state.request_search("jwara").expect("Should not wait for the health check");
        assert_eq!(state.in_flight(), Some(JobKind::Search));
        let _second = state.request_health().expect_err("One health check at a time");

        assert!(execute(&mut state, &api, health).is_none());
        assert_eq!(state.in_flight(), Some(JobKind::Search));
        let _again = state.request_health().expect("Should start after the first finished");

        execute(&mut state, &api, search);
        assert!(state.in_flight().is_none());
        assert_eq!(state.results().entries().len(), 2);
    }

    #[test]
    fn test_choose_coding_sets_final_coding() {
        let api = api();
        let mut state = DashboardState::new();

        let job = state.request_search("cold").expect("Should validate");
        execute(&mut state, &api, job);
        let job = state.select_result(0).expect("Not busy").expect("Should select");
        execute(&mut state, &api, job);

        let chosen = state.choose_coding(DiagnosisChoice::Traditional).expect("Should choose").clone();
        assert_eq!(chosen.code_or_blank(), "TM2-GEN");
        assert_eq!(
            state.selected_condition().and_then(|s| s.final_coding.as_ref()),
            Some(&chosen)
        );

        let preview = state.preview().expect("Should be loaded");
        assert!(!preview.is_visible(DiagnosisChoice::Biomedical));
        assert!(state.choose_coding(DiagnosisChoice::Biomedical).is_none());
    }

    #[test]
    fn test_short_translation_is_a_preview_error() {
        let api = api().with_translation(json!({"code": {"coding": [{"display": "cold"}]}}));
        let mut state = DashboardState::new();

        let job = state.request_search("cold").expect("Should validate");
        execute(&mut state, &api, job);
        let job = state.select_result(0).expect("Not busy").expect("Should select");

        assert_eq!(execute(&mut state, &api, job).as_deref(), Some("Error loading code preview"));
        assert!(state.preview().is_none());
        assert!(state.choose_coding(DiagnosisChoice::Biomedical).is_none());
    }

    #[test]
    fn test_stale_preview_is_discarded() {
        let mut state = DashboardState::new();
        let job = state.request_search("cold").expect("Should validate");
        execute(&mut state, &api(), job);

        let outcome = JobOutcome::PreviewLoaded {
            term: "something else".to_string(),
            translation: translation(),
        };
        assert!(state.complete(JobKind::Preview, Ok(outcome)).is_none());
        assert!(state.preview().is_none());
    }

    #[test]
    fn test_report_requires_patient_and_coding() {
        let api = api();
        let mut state = DashboardState::new();

        let err = state.request_report().expect_err("Should be blocked");
        assert_eq!(err.user_message(JobKind::Report), "Select patient and diagnosis interpretation");

        // Condition selected but no final coding yet.
        let job = state.request_create_patient("Asha", "female", "1990-04-12").expect("Should validate");
        execute(&mut state, &api, job);
        let job = state.request_search("cold").expect("Should validate");
        execute(&mut state, &api, job);
        let job = state.select_result(0).expect("Not busy").expect("Should select");
        execute(&mut state, &api, job);

        assert!(matches!(state.request_report(), Err(DashboardError::Precondition(_))));
        assert!(!api
            .calls()
            .iter()
            .any(|c| matches!(c, ApiCall::CreateCondition(_) | ApiCall::GenerateReport(_))));
    }

    #[test]
    fn test_report_failure_leaves_output_unchanged() {
        let mut state = DashboardState::new();
        let api = api();
        let job = state.request_create_patient("Asha", "female", "1990-04-12").expect("Should validate");
        execute(&mut state, &api, job);
        let job = state.request_search("cold").expect("Should validate");
        execute(&mut state, &api, job);
        let job = state.select_result(0).expect("Not busy").expect("Should select");
        execute(&mut state, &api, job);
        state.choose_coding(DiagnosisChoice::Biomedical);

        let failing = self::api().failing(Endpoint::Report);
        let job = state.request_report().expect("Should be ready");
        assert_eq!(execute(&mut state, &failing, job).as_deref(), Some("Error generating FHIR bundle"));
        assert!(state.report_output().is_none());

        // The condition was recorded before the bundle step failed.
        assert!(matches!(failing.calls()[0], ApiCall::CreateCondition(_)));
    }

    #[test]
    fn test_report_steps_are_reported_in_order() {
        let job = Job::Report {
            patient: PatientResource(json!({"id": "patient-001"})),
            term: "cold".to_string(),
            system: "ayurveda".to_string(),
            final_coding: Coding::default(),
        };
        let mut steps = Vec::new();
        run_job(&api(), job, &mut |step| steps.push(step)).expect("Should run");
        assert_eq!(steps, vec![ReportStep::RecordingCondition, ReportStep::AssemblingBundle]);
    }

    #[test]
    fn test_upload_requires_report() {
        let mut state = DashboardState::new();
        let err = state.request_upload().expect_err("Should be blocked");
        assert_eq!(err.user_message(JobKind::Upload), "Generate a report first");
    }

    #[test]
    fn test_health_failure_marks_backend_down() {
        let mut state = DashboardState::new();
        let job = state.request_health().expect("Should start");
        let toast = execute(&mut state, &api().failing(Endpoint::Health), job);
        assert_eq!(toast.as_deref(), Some("Backend unreachable"));
        assert_eq!(state.backend(), &BackendStatus::Down);

        let job = state.request_health().expect("Should start");
        assert!(execute(&mut state, &api(), job).is_none());
        assert!(matches!(state.backend(), BackendStatus::Up(h) if h.is_running()));
    }

    #[test]
    fn test_end_to_end_rule_based_biomedical_report() {
        let bundle = json!({
            "resourceType": "Bundle",
            "id": "b-1",
            "type": "collection",
            "entry": [{"fullUrl": "urn:uuid:b-1-patient", "resource": {"id": "patient-001"}}]
        });
        let api = api()
            .with_search(SearchResponse {
                status: "not_found".to_string(),
                results: Vec::new(),
            })
            .with_condition(json!({
                "resourceType": "Condition",
                "subject": {"reference": "Patient/patient-001"},
                "code": {"coding": [{"system": "NAMASTE-AYURVEDA", "display": "cold"}, {"code": "TM2-GEN"}, {"code": "ZZ00"}]}
            }))
            .with_report(bundle.clone());
        let mut state = DashboardState::new();

        let job = state.request_create_patient("Asha", "female", "1990-04-12").expect("Should validate");
        execute(&mut state, &api, job);

        let job = state.request_search("cold").expect("Should validate");
        execute(&mut state, &api, job);
        assert_eq!(state.results().entries()[0].label, "cold (rule-based)");

        let job = state.select_result(0).expect("Not busy").expect("Should select");
        execute(&mut state, &api, job);
        state.choose_coding(DiagnosisChoice::Biomedical).expect("Should choose");

        let job = state.request_report().expect("Should be ready");
        let toast = execute(&mut state, &api, job);
        assert_eq!(toast.as_deref(), Some("FHIR bundle generated successfully"));

        let expected = serde_json::to_string_pretty(&bundle).expect("Should render");
        assert_eq!(state.report_output(), Some(expected.as_str()));
        assert!(expected.starts_with("{\n  \"resourceType\": \"Bundle\""));

        let calls = api.calls();
        let ApiCall::CreateCondition(condition_request) = &calls[3] else {
            panic!("expected condition call, got {:?}", calls[3]);
        };
        assert_eq!(condition_request.patient_id, json!("patient-001"));
        assert_eq!(condition_request.term, "cold");
        assert_eq!(condition_request.system, "ayurveda");

        let ApiCall::GenerateReport(report_request) = &calls[4] else {
            panic!("expected report call, got {:?}", calls[4]);
        };
        assert_eq!(report_request.patient["id"], "patient-001");
        assert_eq!(
            report_request.condition["code"]["coding"],
            json!([
                {"system": "NAMASTE-AYURVEDA", "display": "cold"},
                {"system": "ICD-11", "code": "ZZ00", "display": "Condition not elsewhere classified", "mappingType": "suggested"}
            ])
        );

        let job = state.request_upload().expect("Should have a bundle");
        assert_eq!(execute(&mut state, &api, job).as_deref(), Some("Bundle uploaded: bundle received"));
    }
}
