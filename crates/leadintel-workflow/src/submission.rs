//! Research form state and the submission lifecycle.
//!
//! `Idle -> Submitting -> Idle`. A successful submission clears the form; a
//! failed one keeps the entered values and records a message for display.
//! Only one submission may be in flight at a time, and the form is frozen
//! while it is.

use leadintel_api::{ApiError, ResearchApi};
use leadintel_core::{LeadAnalysis, LeadResearchRequest, RequestError};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SubmitError {
    /// Required fields missing; no network call was made.
    #[error(transparent)]
    Validation(#[from] RequestError),
    #[error("a research request is already in progress")]
    InFlight,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SubmitError {
    /// Text shown to the operator: the backend's detail when it sent one,
    /// otherwise the error's own message.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Api(err) => err
                .detail()
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string()),
            other => other.to_string(),
        }
    }
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadForm {
    pub company_name: String,
    pub company_domain: String,
    pub icp_persona: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

pub struct RequestSubmission {
    form: LeadForm,
    state: SubmissionState,
    error: Option<String>,
}

impl Default for RequestSubmission {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSubmission {
    pub fn new() -> Self {
        Self {
            form: LeadForm::default(),
            state: SubmissionState::Idle,
            error: None,
        }
    }

    pub fn form(&self) -> &LeadForm {
        &self.form
    }

    /// Editable form; refused while a request is in flight.
    pub fn form_mut(&mut self) -> Result<&mut LeadForm, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        Ok(&mut self.form)
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Message from the last failed attempt, cleared on the next attempt.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Validate the form and enter `Submitting`.
    ///
    /// Returns the request to send. Fails without touching the network when
    /// a submission is already in flight or required fields are empty.
    pub fn begin(&mut self) -> Result<LeadResearchRequest, SubmitError> {
        if self.is_submitting() {
            return Err(SubmitError::InFlight);
        }
        self.error = None;
        let request = LeadResearchRequest::new(
            &self.form.company_name,
            &self.form.company_domain,
            &self.form.icp_persona,
        )
        .map_err(|err| self.fail(err.into()))?;
        self.state = SubmissionState::Submitting;
        Ok(request)
    }

    /// Apply the backend's answer to a request started with [`begin`](Self::begin).
    pub fn complete(
        &mut self,
        outcome: Result<LeadAnalysis, ApiError>,
    ) -> Result<LeadAnalysis, SubmitError> {
        self.state = SubmissionState::Idle;
        match outcome {
            Ok(lead) => {
                info!(id = %lead.id, "research request succeeded");
                self.form = LeadForm::default();
                Ok(lead)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    /// Validate, send and apply the outcome in one call.
    pub async fn submit(&mut self, api: &dyn ResearchApi) -> Result<LeadAnalysis, SubmitError> {
        let request = self.begin()?;
        let outcome = api.submit_research(&request).await;
        self.complete(outcome)
    }

    fn fail(&mut self, err: SubmitError) -> SubmitError {
        let message = err.user_message();
        warn!(error = %message, "research request failed");
        self.error = Some(message);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeApi, lead};

    fn filled(name: &str, domain: &str, persona: &str) -> RequestSubmission {
        let mut sub = RequestSubmission::new();
        *sub.form_mut().unwrap() = LeadForm {
            company_name: name.into(),
            company_domain: domain.into(),
            icp_persona: persona.into(),
        };
        sub
    }

    #[tokio::test]
    async fn missing_company_makes_no_network_call() {
        let api = FakeApi::new();
        let mut sub = filled("", "   ", "CTO");

        let err = sub.submit(&api).await.unwrap_err();

        assert!(matches!(
            err,
            SubmitError::Validation(RequestError::MissingCompany)
        ));
        assert_eq!(api.submit_calls(), 0);
        assert_eq!(sub.state(), SubmissionState::Idle);
        assert_eq!(sub.error(), Some("Please provide company name or domain"));
        assert_eq!(sub.form().company_domain, "   ");
    }

    #[tokio::test]
    async fn empty_persona_rejected_regardless_of_company() {
        let api = FakeApi::new();
        for (name, domain) in [("Acme", ""), ("", "acme.com"), ("Acme", "acme.com")] {
            let mut sub = filled(name, domain, "");
            let err = sub.submit(&api).await.unwrap_err();
            assert!(matches!(
                err,
                SubmitError::Validation(RequestError::MissingPersona)
            ));
        }
        assert_eq!(api.submit_calls(), 0);
    }

    #[tokio::test]
    async fn success_resets_fields() {
        let api = FakeApi::new();
        api.push_submit(Ok(lead("l1", "Acme", 80.0, 0.5)));
        let mut sub = filled("Acme", "acme.com", "CTO");

        let result = sub.submit(&api).await.unwrap();

        assert_eq!(result.id, "l1");
        assert_eq!(sub.form(), &LeadForm::default());
        assert_eq!(sub.state(), SubmissionState::Idle);
        assert!(sub.error().is_none());
        let sent = api.last_request().unwrap();
        assert_eq!(sent.company_domain.as_deref(), Some("acme.com"));
    }

    #[tokio::test]
    async fn failure_keeps_fields_and_shows_backend_detail() {
        let api = FakeApi::new();
        api.push_submit(Err(ApiError::Server {
            status: 500,
            detail: Some("Agent failed".into()),
        }));
        let mut sub = filled("Acme", "", "CTO");
        let before = sub.form().clone();

        let err = sub.submit(&api).await.unwrap_err();

        assert_eq!(err.user_message(), "Agent failed");
        assert_eq!(sub.error(), Some("Agent failed"));
        assert_eq!(sub.form(), &before);
        assert_eq!(sub.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn failure_without_detail_shows_error_message() {
        let api = FakeApi::new();
        api.push_submit(Err(ApiError::Validation {
            status: 400,
            detail: None,
        }));
        let mut sub = filled("Acme", "", "CTO");

        sub.submit(&api).await.unwrap_err();

        assert_eq!(
            sub.error(),
            Some("research backend rejected the request (HTTP 400)")
        );
    }

    #[test]
    fn second_begin_while_submitting_is_rejected() {
        let mut sub = filled("Acme", "", "CTO");
        sub.begin().unwrap();
        assert!(sub.is_submitting());

        let err = sub.begin().unwrap_err();

        assert!(matches!(err, SubmitError::InFlight));
        assert!(sub.is_submitting());
        assert!(sub.error().is_none());
    }

    #[tokio::test]
    async fn form_is_frozen_while_submitting() {
        let api = FakeApi::new();
        api.push_submit(Err(ApiError::Server {
            status: 503,
            detail: None,
        }));
        let mut sub = filled("Acme", "", "CTO");
        let sent = sub.form().clone();
        let request = sub.begin().unwrap();

        assert!(matches!(sub.form_mut(), Err(SubmitError::InFlight)));

        let outcome = api.submit_research(&request).await;
        sub.complete(outcome).unwrap_err();
        assert_eq!(sub.form(), &sent);
        sub.form_mut().unwrap().icp_persona = "VP Sales".into();
        assert_eq!(sub.form().icp_persona, "VP Sales");
    }

    #[test]
    fn retry_after_failure_clears_previous_error() {
        let mut sub = filled("", "", "CTO");
        sub.begin().unwrap_err();
        assert!(sub.error().is_some());

        sub.form_mut().unwrap().company_name = "Acme".into();
        sub.begin().unwrap();

        assert!(sub.error().is_none());
        assert!(sub.is_submitting());
    }
}
