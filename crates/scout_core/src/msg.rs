use crate::{JobHandle, JobRequest, JobStatus, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to launch a scrape job.
    StartRequested(JobRequest),
    /// The submit call returned.
    SubmitFinished {
        run: RunId,
        result: Result<JobHandle, String>,
    },
    /// The poll timer elapsed.
    PollDue { run: RunId },
    /// A status query returned.
    StatusReceived {
        run: RunId,
        result: Result<JobStatus, String>,
    },
    /// User cancelled or wants to start over.
    ResetRequested,
}
