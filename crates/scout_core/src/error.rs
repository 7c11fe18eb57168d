use thiserror::Error;

/// Errors surfaced by the scrape-job monitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("a scrape job is already running")]
    AlreadyRunning,
    #[error("{0}")]
    SubmitFailed(String),
    #[error("{0}")]
    StatusFailed(String),
    #[error("job still running after {attempts} status checks")]
    Timeout { attempts: u32 },
    #[error("start abandoned by reset")]
    Cancelled,
    #[error("monitor stopped")]
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unsupported max results {0}, expected one of 20, 30, 50, 100")]
pub struct InvalidMaxResults(pub u32);
