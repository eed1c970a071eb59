//! Lead analysis records as produced by the research backend.
//!
//! The backend owns these records; the client only reads them. Everything
//! other than `id` is optional on the wire, so scalar fields are `Option`s
//! and collections deserialise an absent or `null` value as empty.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A researched company with decision makers, tech stack, outreach email and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadAnalysis {
    pub id: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_domain: Option<String>,
    #[serde(default)]
    pub icp_persona: Option<String>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub decision_makers: Vec<DecisionMaker>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub tech_stack: Vec<TechStackEntry>,
    #[serde(default)]
    pub pain_hypothesis: Option<String>,
    #[serde(default)]
    pub generated_email: Option<GeneratedEmail>,
    #[serde(default)]
    pub score: Option<LeadScore>,
    #[serde(default)]
    pub analysis: Option<CompanyAnalysis>,
    /// Backend processing status, e.g. `"completed"`.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionMaker {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    /// 0.0 to 1.0.
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub linkedin_url: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechStackEntry {
    #[serde(default)]
    pub technology: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Detection confidence, 0.0 to 1.0.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Outreach email drafted for the lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub personalization_elements: Vec<String>,
    #[serde(default)]
    pub cta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadScore {
    /// 0.0 to 1.0.
    #[serde(default)]
    pub reply_probability: Option<f64>,
    /// 0 to 100.
    #[serde(default)]
    pub quality_score: Option<f64>,
    /// Named sub-metrics, each 0 to 10.
    #[serde(default, deserialize_with = "nullable_map")]
    pub factors: BTreeMap<String, f64>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Narrative company research.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyAnalysis {
    #[serde(default)]
    pub company_summary: Option<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub key_insights: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub pain_points: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub opportunities: Vec<String>,
}

/// One page of the backend's lead listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadPage {
    #[serde(default, deserialize_with = "nullable_vec")]
    pub leads: Vec<LeadAnalysis>,
    /// Total leads stored on the backend, not the page length.
    #[serde(default)]
    pub total: Option<u64>,
}

impl LeadAnalysis {
    pub fn reply_probability(&self) -> Option<f64> {
        self.score.as_ref().and_then(|s| s.reply_probability)
    }

    pub fn quality_score(&self) -> Option<f64> {
        self.score.as_ref().and_then(|s| s.quality_score)
    }

    /// Company name, falling back to the domain, then the id.
    pub fn display_name(&self) -> &str {
        non_empty(self.company_name.as_deref())
            .or_else(|| non_empty(self.company_domain.as_deref()))
            .unwrap_or(&self.id)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

// ── Lenient deserialisers ──

fn nullable_vec<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(de)?.unwrap_or_default())
}

fn nullable_map<'de, D>(de: D) -> Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, f64>>::deserialize(de)?.unwrap_or_default())
}

/// Accepts RFC 3339 timestamps and naive ISO 8601 ones (read as UTC).
fn timestamp<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(de)? else {
        return Ok(None);
    };
    parse_timestamp(&raw)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
