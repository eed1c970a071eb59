//! Lead analysis types, research request validation, result presentation and history stats.

pub mod lead;
pub mod present;
pub mod request;
pub mod stats;

pub use lead::{
    CompanyAnalysis, DecisionMaker, GeneratedEmail, LeadAnalysis, LeadPage, LeadScore,
    TechStackEntry,
};
pub use present::{HistoryEntry, ResultView, ScoreBadge, Tier, present};
pub use request::{LeadResearchRequest, RequestError};
pub use stats::AggregateStats;

/// Number of recent leads shown in the history sidebar.
pub const HISTORY_LIMIT: usize = 5;
