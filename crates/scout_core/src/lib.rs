//! Scout core: pure scrape-job monitor state machine and view-model helpers.
mod effect;
mod error;
mod msg;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use error::{InvalidMaxResults, MonitorError};
pub use msg::Msg;
pub use request::{JobHandle, JobRequest, JobStatus, MaxResults};
pub use state::{JobOutcome, MonitorState, Phase, RunId, DEFAULT_MAX_ATTEMPTS};
pub use update::update;
pub use view_model::MonitorView;
