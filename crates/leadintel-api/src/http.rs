//! HTTP client for the lead research backend's `/api/leads` endpoints.

use async_trait::async_trait;
use leadintel_core::{LeadAnalysis, LeadPage, LeadResearchRequest};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

/// Local development backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend could not be reached, or the connection dropped mid-response.
    #[error("could not reach the research backend")]
    Network(#[from] reqwest::Error),
    /// The backend rejected the payload (4xx).
    #[error("{}", describe(.status, .detail.as_deref(), "rejected the request"))]
    Validation { status: u16, detail: Option<String> },
    /// The backend failed while handling the request (5xx).
    #[error("{}", describe(.status, .detail.as_deref(), "failed"))]
    Server { status: u16, detail: Option<String> },
    #[error("unexpected response from the research backend: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid research backend URL: {0}")]
    InvalidUrl(String),
}

fn describe(status: &u16, detail: Option<&str>, what: &str) -> String {
    match detail {
        Some(detail) => detail.to_string(),
        None => format!("research backend {what} (HTTP {status})"),
    }
}

impl ApiError {
    /// Human-readable message supplied by the backend, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Validation { detail, .. } | ApiError::Server { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    fn from_status(status: u16, body: &str) -> Self {
        let detail = extract_detail(body);
        if status >= 500 {
            ApiError::Server { status, detail }
        } else {
            ApiError::Validation { status, detail }
        }
    }
}

/// Pull the `detail` message out of an error body.
///
/// A string `detail` is returned as-is; any other `detail` value (e.g. a list
/// of field errors) as compact JSON. Bodies that are not JSON objects are
/// returned trimmed; blank bodies yield `None`.
fn extract_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => match map.get("detail") {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        },
        _ => Some(body.to_string()),
    }
}

/// Operations the workflow needs from the research backend.
#[async_trait]
pub trait ResearchApi: Send + Sync {
    /// Run the research agent for one company. This can take minutes.
    async fn submit_research(
        &self,
        request: &LeadResearchRequest,
    ) -> Result<LeadAnalysis, ApiError>;

    /// Most recent analyses, newest first.
    async fn list_history(&self, limit: usize) -> Result<Vec<LeadAnalysis>, ApiError>;

    async fn fetch_lead(&self, id: &str) -> Result<LeadAnalysis, ApiError>;

    async fn health(&self) -> Result<(), ApiError>;
}

/// HTTP client for the research backend.
pub struct LeadClient {
    client: reqwest::Client,
    base_url: String,
}

impl LeadClient {
    /// Create a new client for the given backend base URL.
    ///
    /// `base_url` should be like `http://localhost:8000` (no trailing slash).
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One page of stored leads, newest first, with the backend's total count.
    pub async fn list_page(&self, skip: usize, limit: usize) -> Result<LeadPage, ApiError> {
        let url = format!("{}/api/leads", self.base_url);
        debug!(url = %url, skip, limit, "listing leads");
        let resp = self
            .client
            .get(&url)
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await?;
        let page: LeadPage = decode(resp).await?;
        debug!(count = page.leads.len(), total = ?page.total, "listed leads");
        Ok(page)
    }

    /// `{base}/api/leads/{id}` with `id` escaped as a single path segment.
    fn lead_url(&self, id: &str) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["api", "leads", id]);
        Ok(url)
    }
}

/// Map non-2xx responses onto [`ApiError`] and decode the body otherwise.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(ApiError::from_status(status.as_u16(), &body));
    }
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl ResearchApi for LeadClient {
    async fn submit_research(
        &self,
        request: &LeadResearchRequest,
    ) -> Result<LeadAnalysis, ApiError> {
        let url = format!("{}/api/leads/research", self.base_url);
        info!(
            url = %url,
            company = ?request.company_name,
            domain = ?request.company_domain,
            "submitting research request"
        );
        let resp = self.client.post(&url).json(request).send().await?;
        let lead: LeadAnalysis = decode(resp).await?;
        info!(id = %lead.id, "research complete");
        Ok(lead)
    }

    async fn list_history(&self, limit: usize) -> Result<Vec<LeadAnalysis>, ApiError> {
        Ok(self.list_page(0, limit).await?.leads)
    }

    async fn fetch_lead(&self, id: &str) -> Result<LeadAnalysis, ApiError> {
        let url = self.lead_url(id)?;
        debug!(url = %url, "fetching lead");
        let resp = self.client.get(url).send().await?;
        decode(resp).await
    }

    async fn health(&self) -> Result<(), ApiError> {
        let url = format!("{}/api/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let _: serde_json::Value = decode(resp).await?;
        Ok(())
    }
}
