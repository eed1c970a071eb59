//! Client workflow: the research form's submission lifecycle and the
//! controller that switches between form and result views.

pub mod controller;
pub mod submission;

pub use controller::{
    HistoryFetch, HistoryLoaded, LeadFetch, PendingSubmission, ViewState, WorkflowController,
};
pub use submission::{LeadForm, RequestSubmission, SubmissionState, SubmitError};

#[cfg(test)]
pub(crate) mod fake;
