use async_trait::async_trait;

use scout_core::{JobHandle, JobRequest, JobStatus};

use crate::ServiceError;

/// The external agent service that runs scrape jobs.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Submit a job. Non-2xx responses and malformed bodies are errors.
    async fn submit(&self, request: &JobRequest) -> Result<JobHandle, ServiceError>;

    /// Latest status of a submitted job.
    async fn status(&self, handle: &JobHandle) -> Result<JobStatus, ServiceError>;
}
