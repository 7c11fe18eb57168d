use crate::{JobHandle, JobRequest, RunId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the job to the agent service; answer with `Msg::SubmitFinished`.
    SubmitJob { run: RunId, request: JobRequest },
    /// Schedule one `Msg::PollDue` after the poll interval.
    ArmPollTimer { run: RunId },
    /// Cancel any pending timer and in-flight request.
    DisarmPollTimer,
    /// Fetch the job status; answer with `Msg::StatusReceived`.
    QueryStatus { run: RunId, handle: JobHandle },
}
