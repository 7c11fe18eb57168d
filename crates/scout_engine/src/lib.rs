//! Scout engine: agent service client and scrape-job monitor driver.
mod client;
mod leads;
mod monitor;
mod service;
mod types;

pub use client::{AgentClient, ServiceSettings, DEFAULT_LEAD_LIMIT};
pub use leads::{
    AgentStats, EnrichedLead, LeadStage, QualifiedLead, RawLead, ScoreBand, ServiceFit,
};
pub use monitor::{MonitorSettings, ScrapeJobMonitor};
pub use service::JobService;
pub use types::{FailureKind, ServiceError};
