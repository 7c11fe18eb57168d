use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use scout_core::{JobRequest, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Malformed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Malformed => write!(f, "malformed response"),
        }
    }
}

/// Body of `POST /scrape/start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct StartScrapeBody<'a> {
    pub query: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub max_results: u32,
}

impl<'a> From<&'a JobRequest> for StartScrapeBody<'a> {
    fn from(request: &'a JobRequest) -> Self {
        Self {
            query: request.query(),
            city: request.city(),
            country: request.country(),
            max_results: request.max_results().get(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StartScrapeResponse {
    pub job_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum WireStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Body of `GET /scrape/status/{job_id}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusResponse {
    pub status: WireStatus,
    #[serde(default)]
    pub leads_qualified: Option<u32>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl From<StatusResponse> for JobStatus {
    fn from(response: StatusResponse) -> Self {
        match response.status {
            WireStatus::Pending => JobStatus::Pending,
            WireStatus::Running => JobStatus::Running,
            WireStatus::Completed => JobStatus::Completed {
                leads_qualified: response.leads_qualified.unwrap_or(0),
            },
            WireStatus::Failed => JobStatus::Failed {
                error_message: response
                    .error_message
                    .filter(|message| !message.is_empty())
                    .unwrap_or_else(|| "unknown error".to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct ApproveBody<'a> {
    pub qualified_lead_id: &'a str,
    pub approved_by: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct RejectBody<'a> {
    pub qualified_lead_id: &'a str,
}
