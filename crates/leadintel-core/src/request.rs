//! Research request payload and its local validation.

use serde::Serialize;
use thiserror::Error;

/// Required-field violations caught before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("Please provide company name or domain")]
    MissingCompany,
    #[error("Please describe the target ICP persona")]
    MissingPersona,
}

/// Body of `POST /api/leads/research`.
///
/// Empty company fields are sent as `null`, never as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadResearchRequest {
    pub company_name: Option<String>,
    pub company_domain: Option<String>,
    pub icp_persona: String,
}

impl LeadResearchRequest {
    /// Build a request from raw form input.
    ///
    /// Whitespace-only values count as empty. The company check runs first,
    /// so a form with neither company field nor persona reports the company.
    pub fn new(
        company_name: &str,
        company_domain: &str,
        icp_persona: &str,
    ) -> Result<Self, RequestError> {
        let company_name = filled(company_name);
        let company_domain = filled(company_domain);
        if company_name.is_none() && company_domain.is_none() {
            return Err(RequestError::MissingCompany);
        }
        let icp_persona = filled(icp_persona).ok_or(RequestError::MissingPersona)?;
        Ok(Self {
            company_name,
            company_domain,
            icp_persona,
        })
    }
}

fn filled(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
