//! Top-level workflow: form vs. result view, the current analysis, and the
//! recent-leads snapshot with its aggregate stats.
//!
//! Network work is handed out as `Send` futures ([`PendingSubmission`],
//! [`HistoryFetch`], [`LeadFetch`]) so an event loop can run them in the
//! background and feed the outcome back through the matching `finish_*` /
//! `apply_*` method. The `async` convenience methods do both steps inline.

use std::sync::Arc;

use leadintel_api::{ApiError, ResearchApi};
use leadintel_core::{
    AggregateStats, HISTORY_LIMIT, HistoryEntry, LeadAnalysis, LeadResearchRequest, ResultView,
    present,
};
use tracing::{debug, info, warn};

use crate::submission::{RequestSubmission, SubmitError};

/// What the screen is showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState<'a> {
    ViewingForm,
    ViewingResult(&'a LeadAnalysis),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Form,
    Result,
}

/// A validated research request ready to send.
pub struct PendingSubmission {
    api: Arc<dyn ResearchApi>,
    request: LeadResearchRequest,
}

impl PendingSubmission {
    pub fn request(&self) -> &LeadResearchRequest {
        &self.request
    }

    pub async fn run(self) -> Result<LeadAnalysis, ApiError> {
        self.api.submit_research(&self.request).await
    }
}

/// One history refresh, tagged with its issue order.
pub struct HistoryFetch {
    api: Arc<dyn ResearchApi>,
    seq: u64,
}

pub struct HistoryLoaded {
    seq: u64,
    result: Result<Vec<LeadAnalysis>, ApiError>,
}

impl HistoryFetch {
    pub async fn run(self) -> HistoryLoaded {
        HistoryLoaded {
            seq: self.seq,
            result: self.api.list_history(HISTORY_LIMIT).await,
        }
    }
}

/// Fetch of a lead that is not in the local history window.
pub struct LeadFetch {
    api: Arc<dyn ResearchApi>,
    id: String,
}

impl LeadFetch {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn run(self) -> Result<LeadAnalysis, ApiError> {
        self.api.fetch_lead(&self.id).await
    }
}

pub struct WorkflowController {
    api: Arc<dyn ResearchApi>,
    submission: RequestSubmission,
    screen: Screen,
    current: Option<LeadAnalysis>,
    history: Vec<LeadAnalysis>,
    stats: AggregateStats,
    history_issued: u64,
    history_applied: u64,
}

impl WorkflowController {
    pub fn new(api: Arc<dyn ResearchApi>) -> Self {
        Self {
            api,
            submission: RequestSubmission::new(),
            screen: Screen::Form,
            current: None,
            history: Vec::new(),
            stats: AggregateStats::default(),
            history_issued: 0,
            history_applied: 0,
        }
    }

    pub fn view(&self) -> ViewState<'_> {
        match (self.screen, &self.current) {
            (Screen::Result, Some(lead)) => ViewState::ViewingResult(lead),
            _ => ViewState::ViewingForm,
        }
    }

    /// Analysis retained for the session, even while the form is showing.
    pub fn current_analysis(&self) -> Option<&LeadAnalysis> {
        self.current.as_ref()
    }

    /// Display data for the result view, if it is active.
    pub fn result_view(&self) -> Option<ResultView> {
        match self.view() {
            ViewState::ViewingResult(lead) => Some(present(lead)),
            ViewState::ViewingForm => None,
        }
    }

    pub fn submission(&self) -> &RequestSubmission {
        &self.submission
    }

    pub fn submission_mut(&mut self) -> &mut RequestSubmission {
        &mut self.submission
    }

    pub fn history(&self) -> &[LeadAnalysis] {
        &self.history
    }

    pub fn history_entries(&self) -> Vec<HistoryEntry> {
        self.history.iter().map(HistoryEntry::from).collect()
    }

    pub fn stats(&self) -> AggregateStats {
        self.stats
    }

    // ── Submission ──

    /// Validate the form and hand out the network call.
    pub fn begin_submission(&mut self) -> Result<PendingSubmission, SubmitError> {
        let request = self.submission.begin()?;
        Ok(PendingSubmission {
            api: Arc::clone(&self.api),
            request,
        })
    }

    /// Apply a submission outcome. On success the result view shows the new
    /// analysis; the caller should then start a history refresh.
    pub fn finish_submission(
        &mut self,
        outcome: Result<LeadAnalysis, ApiError>,
    ) -> Result<(), SubmitError> {
        let lead = self.submission.complete(outcome)?;
        self.show(lead);
        Ok(())
    }

    /// Submit the form, switch to the result and refresh history.
    pub async fn submit(&mut self) -> Result<(), SubmitError> {
        let pending = self.begin_submission()?;
        let outcome = pending.run().await;
        self.finish_submission(outcome)?;
        self.refresh_history().await;
        Ok(())
    }

    // ── Navigation ──

    /// Start over: back to the form with no retained analysis.
    pub fn new_research(&mut self) {
        self.screen = Screen::Form;
        self.current = None;
    }

    /// Back to the form, keeping the current analysis.
    pub fn back_to_form(&mut self) {
        self.screen = Screen::Form;
    }

    /// Return to the retained analysis. False when there is none.
    pub fn resume_result(&mut self) -> bool {
        if self.current.is_none() {
            return false;
        }
        self.screen = Screen::Result;
        true
    }

    /// Show the history entry at `index` (0 = newest).
    pub fn select_history(&mut self, index: usize) -> bool {
        match self.history.get(index).cloned() {
            Some(lead) => {
                self.show(lead);
                true
            }
            None => false,
        }
    }

    pub fn select_history_id(&mut self, id: &str) -> bool {
        match self.history.iter().find(|l| l.id == id).cloned() {
            Some(lead) => {
                self.show(lead);
                true
            }
            None => false,
        }
    }

    /// Show the lead with `id`. Returns a fetch to run when it is not in the
    /// history window; feed its result to [`finish_open`](Self::finish_open).
    pub fn open_lead(&mut self, id: &str) -> Option<LeadFetch> {
        if self.select_history_id(id) {
            return None;
        }
        Some(LeadFetch {
            api: Arc::clone(&self.api),
            id: id.to_string(),
        })
    }

    /// Show a fetched lead. On failure the view is left unchanged.
    pub fn finish_open(&mut self, result: Result<LeadAnalysis, ApiError>) -> Result<(), ApiError> {
        let lead = result.inspect_err(|err| warn!(error = %err, "failed to open lead"))?;
        self.show(lead);
        Ok(())
    }

    fn show(&mut self, lead: LeadAnalysis) {
        debug!(id = %lead.id, "showing result");
        self.current = Some(lead);
        self.screen = Screen::Result;
    }

    // ── History ──

    /// Hand out a history refresh. Later fetches supersede earlier ones.
    pub fn history_fetch(&mut self) -> HistoryFetch {
        self.history_issued += 1;
        HistoryFetch {
            api: Arc::clone(&self.api),
            seq: self.history_issued,
        }
    }

    /// Replace the history snapshot with a fetched one.
    ///
    /// Failures keep the last good snapshot, as do responses older than the
    /// one already applied. Returns whether the snapshot changed.
    pub fn apply_history(&mut self, loaded: HistoryLoaded) -> bool {
        if loaded.seq < self.history_applied {
            debug!(seq = loaded.seq, applied = self.history_applied, "discarding stale history");
            return false;
        }
        match loaded.result {
            Ok(mut leads) => {
                leads.truncate(HISTORY_LIMIT);
                self.history_applied = loaded.seq;
                self.stats = AggregateStats::from_history(&leads);
                self.history = leads;
                info!(count = self.history.len(), "history refreshed");
                true
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch history; keeping last snapshot");
                false
            }
        }
    }

    pub async fn refresh_history(&mut self) -> bool {
        let loaded = self.history_fetch().run().await;
        self.apply_history(loaded)
    }
}
