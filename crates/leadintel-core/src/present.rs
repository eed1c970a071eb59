//! Display-ready projection of a [`LeadAnalysis`].
//!
//! [`present`] is total: missing names and collections produce empty
//! sections, and a missing score renders as a 0% badge, never an error.

use chrono::{DateTime, Utc};

use crate::{LeadAnalysis, TechStackEntry};

/// Score tier shared by the reply and quality badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Strong,
    Moderate,
    Weak,
}

impl Tier {
    /// `>= 80` strong, `60..=79` moderate, below 60 weak.
    pub fn for_percent(percent: i64) -> Self {
        match percent {
            p if p >= 80 => Tier::Strong,
            p if p >= 60 => Tier::Moderate,
            _ => Tier::Weak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::Strong => "strong",
            Tier::Moderate => "moderate",
            Tier::Weak => "weak",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBadge {
    pub percent: i64,
    pub tier: Tier,
}

impl ScoreBadge {
    fn new(percent: i64) -> Self {
        Self {
            percent,
            tier: Tier::for_percent(percent),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub company_name: String,
    pub company_domain: Option<String>,
    pub icp_persona: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailView {
    pub subject: Option<String>,
    pub body: Option<String>,
    pub personalization: Vec<String>,
    pub cta: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightsView {
    pub company_summary: Option<String>,
    pub key_insights: Vec<String>,
    pub pain_points: Vec<String>,
    pub opportunities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionMakerView {
    pub name: String,
    pub title: Option<String>,
    /// Fallback avatar label.
    pub initials: String,
    /// Relevance bar width in percent, within `[0, 100]`.
    pub relevance_width: f64,
    pub linkedin_url: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorBar {
    pub name: String,
    pub value: f64,
    /// Bar width in percent of the 0-10 factor scale.
    pub width: f64,
}

/// Everything the result view renders, grouped by section.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub header: Header,
    pub reply_badge: ScoreBadge,
    pub quality_badge: ScoreBadge,
    pub email: EmailView,
    pub insights: InsightsView,
    pub pain_hypothesis: Option<String>,
    pub decision_makers: Vec<DecisionMakerView>,
    pub tech_stack: Vec<TechStackEntry>,
    pub factors: Vec<FactorBar>,
    pub reasoning: Option<String>,
}

/// Row in the recent-leads list.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub company_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub reply_percent: i64,
    pub quality: i64,
}

impl From<&LeadAnalysis> for HistoryEntry {
    fn from(lead: &LeadAnalysis) -> Self {
        Self {
            id: lead.id.clone(),
            company_name: lead.display_name().to_string(),
            created_at: lead.created_at,
            reply_percent: reply_percent(lead.reply_probability().unwrap_or(0.0)),
            quality: lead.quality_score().unwrap_or(0.0).round() as i64,
        }
    }
}

/// Derive the result view for one analysis.
pub fn present(lead: &LeadAnalysis) -> ResultView {
    let score = lead.score.as_ref();

    let email = lead
        .generated_email
        .as_ref()
        .map(|e| EmailView {
            subject: e.subject.clone(),
            body: e.body.clone(),
            personalization: e.personalization_elements.clone(),
            cta: e.cta.clone(),
        })
        .unwrap_or_default();

    let insights = lead
        .analysis
        .as_ref()
        .map(|a| InsightsView {
            company_summary: a.company_summary.clone(),
            key_insights: a.key_insights.clone(),
            pain_points: a.pain_points.clone(),
            opportunities: a.opportunities.clone(),
        })
        .unwrap_or_default();

    let decision_makers = lead
        .decision_makers
        .iter()
        .map(|dm| {
            let name = dm.name.clone().unwrap_or_default();
            DecisionMakerView {
                initials: initials(&name),
                name,
                title: dm.title.clone(),
                relevance_width: relevance_width(dm.relevance_score),
                linkedin_url: dm.linkedin_url.clone(),
                email: dm.email.clone(),
            }
        })
        .collect();

    let factors = score
        .map(|s| {
            s.factors
                .iter()
                .map(|(name, &value)| FactorBar {
                    name: name.clone(),
                    value,
                    width: factor_width(value),
                })
                .collect()
        })
        .unwrap_or_default();

    ResultView {
        header: Header {
            company_name: lead.display_name().to_string(),
            company_domain: lead.company_domain.clone(),
            icp_persona: lead.icp_persona.clone(),
            created_at: lead.created_at,
        },
        reply_badge: ScoreBadge::new(reply_percent(lead.reply_probability().unwrap_or(0.0))),
        quality_badge: ScoreBadge::new(lead.quality_score().unwrap_or(0.0).round() as i64),
        email,
        insights,
        pain_hypothesis: lead.pain_hypothesis.clone(),
        decision_makers,
        tech_stack: lead.tech_stack.clone(),
        factors,
        reasoning: score.and_then(|s| s.reasoning.clone()),
    }
}

fn reply_percent(probability: f64) -> i64 {
    (probability * 100.0).round() as i64
}

/// Uppercased first character of each whitespace-separated token.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Missing relevance renders as an empty bar.
pub fn relevance_width(relevance: Option<f64>) -> f64 {
    (relevance.unwrap_or(0.0) * 100.0).clamp(0.0, 100.0)
}

pub fn factor_width(value: f64) -> f64 {
    value / 10.0 * 100.0
}
