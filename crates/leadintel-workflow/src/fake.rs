//! In-memory `ResearchApi` for workflow tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use leadintel_api::{ApiError, ResearchApi};
use leadintel_core::{LeadAnalysis, LeadResearchRequest};

pub(crate) fn lead(id: &str, company: &str, quality: f64, reply: f64) -> LeadAnalysis {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "company_name": company,
        "icp_persona": "CTO",
        "created_at": "2026-06-01T08:30:00Z",
        "score": {"quality_score": quality, "reply_probability": reply, "factors": {"fit": 8}},
    }))
    .unwrap()
}

/// Scripted backend. Submissions pop queued outcomes; history returns the
/// configured list, or a 503 once `fail_history` is set.
pub(crate) struct FakeApi {
    submits: Mutex<VecDeque<Result<LeadAnalysis, ApiError>>>,
    history: Mutex<Vec<LeadAnalysis>>,
    fail_history: Mutex<bool>,
    stored: Mutex<Vec<LeadAnalysis>>,
    requests: Mutex<Vec<LeadResearchRequest>>,
    submit_calls: AtomicUsize,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self {
            submits: Mutex::new(VecDeque::new()),
            history: Mutex::new(Vec::new()),
            fail_history: Mutex::new(false),
            stored: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            submit_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn push_submit(&self, outcome: Result<LeadAnalysis, ApiError>) {
        self.submits.lock().unwrap().push_back(outcome);
    }

    pub(crate) fn set_history(&self, leads: Vec<LeadAnalysis>) {
        *self.history.lock().unwrap() = leads;
    }

    pub(crate) fn fail_history(&self, fail: bool) {
        *self.fail_history.lock().unwrap() = fail;
    }

    /// Leads reachable through `fetch_lead` only.
    pub(crate) fn store(&self, lead: LeadAnalysis) {
        self.stored.lock().unwrap().push(lead);
    }

    pub(crate) fn last_request(&self) -> Option<LeadResearchRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    pub(crate) fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResearchApi for FakeApi {
    async fn submit_research(
        &self,
        request: &LeadResearchRequest,
    ) -> Result<LeadAnalysis, ApiError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted submit outcome")
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<LeadAnalysis>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_history.lock().unwrap() {
            return Err(ApiError::Server {
                status: 503,
                detail: Some("database unavailable".into()),
            });
        }
        let history = self.history.lock().unwrap();
        Ok(history.iter().take(limit).cloned().collect())
    }

    async fn fetch_lead(&self, id: &str) -> Result<LeadAnalysis, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.stored
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .cloned()
            .ok_or(ApiError::Validation {
                status: 404,
                detail: Some("Not found".into()),
            })
    }

    async fn health(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
