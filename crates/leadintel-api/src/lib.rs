//! Research backend gateway: the [`ResearchApi`] seam and its HTTP client.

pub mod http;

pub use http::{ApiError, DEFAULT_BASE_URL, LeadClient, ResearchApi};
