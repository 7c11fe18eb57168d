use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use scout_core::{JobHandle, JobRequest, JobStatus};
use scout_logging::{scout_debug, scout_info};

use crate::types::{ApproveBody, RejectBody, StartScrapeBody, StartScrapeResponse, StatusResponse};
use crate::{AgentStats, FailureKind, JobService, LeadStage, QualifiedLead, ServiceError};

/// Page size used by the inbox listing.
pub const DEFAULT_LEAD_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl ServiceSettings {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ServiceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::new(
                FailureKind::InvalidUrl,
                format!("agent url {base_url} cannot be used as a base"),
            ));
        }
        Ok(Self {
            base_url,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        })
    }
}

/// HTTP client for the lead agent service.
#[derive(Debug, Clone)]
pub struct AgentClient {
    settings: ServiceSettings,
    client: reqwest::Client,
}

impl AgentClient {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.settings.base_url
    }

    /// Leads in `stage`, most recent first as ordered by the service.
    pub async fn qualified_leads(
        &self,
        stage: LeadStage,
        limit: u32,
    ) -> Result<Vec<QualifiedLead>, ServiceError> {
        let mut url = self.endpoint(&["leads", "qualified"])?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("stage", stage.as_str());
        scout_debug!("fetching {} leads from {}", stage, url);
        let leads: Vec<QualifiedLead> = self.get_json(url).await?;
        scout_debug!("fetched {} {} leads", leads.len(), stage);
        Ok(leads)
    }

    pub async fn approve(&self, lead_id: &str, approved_by: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&["leads", "approve"])?;
        let body = ApproveBody {
            qualified_lead_id: lead_id,
            approved_by,
        };
        self.post(url, &body).await?;
        scout_info!("lead {} approved by {}", lead_id, approved_by);
        Ok(())
    }

    pub async fn reject(&self, lead_id: &str) -> Result<(), ServiceError> {
        let url = self.endpoint(&["leads", "reject"])?;
        let body = RejectBody {
            qualified_lead_id: lead_id,
        };
        self.post(url, &body).await?;
        scout_info!("lead {} rejected", lead_id);
        Ok(())
    }

    pub async fn stats(&self) -> Result<AgentStats, ServiceError> {
        let url = self.endpoint(&["stats"])?;
        self.get_json(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ServiceError::new(FailureKind::InvalidUrl, "agent url cannot be used as a base")
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let text = read_success_body(response).await?;
        parse_json(&text)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<String, ServiceError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_success_body(response).await
    }
}

#[async_trait]
impl JobService for AgentClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ServiceError> {
        let url = self.endpoint(&["scrape", "start"])?;
        let text = self.post(url, &StartScrapeBody::from(request)).await?;
        let response: StartScrapeResponse = parse_json(&text)?;
        if response.job_id.is_empty() {
            return Err(ServiceError::new(
                FailureKind::Malformed,
                "start response carried an empty job_id",
            ));
        }
        Ok(JobHandle::new(response.job_id))
    }

    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, ServiceError> {
        let url = self.endpoint(&["scrape", "status", handle.job_id()])?;
        let response: StatusResponse = self.get_json(url).await?;
        Ok(response.into())
    }
}

/// Returns the body of a 2xx response; anything else becomes `HttpStatus`.
async fn read_success_body(response: reqwest::Response) -> Result<String, ServiceError> {
    let status = response.status();
    let text = response.text().await.map_err(map_reqwest_error)?;
    if !status.is_success() {
        let message = if text.trim().is_empty() {
            format!("HTTP {}", status.as_u16())
        } else {
            format!("HTTP {}: {}", status.as_u16(), text.trim())
        };
        return Err(ServiceError::new(
            FailureKind::HttpStatus(status.as_u16()),
            message,
        ));
    }
    Ok(text)
}

fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, ServiceError> {
    serde_json::from_str(text).map_err(|err| {
        ServiceError::new(FailureKind::Malformed, format!("malformed response: {err}"))
    })
}

fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::new(FailureKind::Timeout, err.to_string());
    }
    ServiceError::new(FailureKind::Network, err.to_string())
}
