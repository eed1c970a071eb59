//! Aggregate statistics over the recent-leads window.

use crate::LeadAnalysis;

/// Derived from the in-memory history each time it changes; never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub total: usize,
    /// Mean quality score, rounded to a whole number.
    pub avg_quality: i64,
    /// Mean reply probability as a rounded percentage.
    pub avg_reply: i64,
}

impl AggregateStats {
    /// Compute stats over `history`. Missing scores count as 0.
    pub fn from_history(history: &[LeadAnalysis]) -> Self {
        let total = history.len();
        if total == 0 {
            return Self::default();
        }
        let n = total as f64;
        let quality: f64 = history
            .iter()
            .map(|l| l.quality_score().unwrap_or(0.0))
            .sum();
        let reply: f64 = history
            .iter()
            .map(|l| l.reply_probability().unwrap_or(0.0))
            .sum();
        Self {
            total,
            avg_quality: (quality / n).round() as i64,
            avg_reply: (reply / n * 100.0).round() as i64,
        }
    }
}
