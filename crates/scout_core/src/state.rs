use std::fmt;

use crate::view_model::MonitorView;
use crate::{JobHandle, MonitorError};

/// Number of non-terminal status polls after which a run times out.
/// At the default 5s interval this is roughly three minutes.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 36;

/// Generation number of a run; bumped on every start.
pub type RunId = u64;

/// Terminal outcome reported by the agent service itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { leads_qualified: u32 },
    Failed { error_message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Starting,
    Running(JobHandle),
    Settled(JobOutcome),
    TimedOut,
    Errored(MonitorError),
}

impl Phase {
    /// Starting or Running: a new start is rejected.
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Starting | Phase::Running(_))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Settled(_) | Phase::TimedOut | Phase::Errored(_))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Starting => write!(f, "starting"),
            Phase::Running(handle) => write!(f, "running({})", handle.short_id()),
            Phase::Settled(JobOutcome::Completed { leads_qualified }) => {
                write!(f, "settled(completed {leads_qualified})")
            }
            Phase::Settled(JobOutcome::Failed { error_message }) => {
                write!(f, "settled(failed {error_message:?})")
            }
            Phase::TimedOut => write!(f, "timed out"),
            Phase::Errored(err) => write!(f, "errored({err})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    phase: Phase,
    attempt_count: u32,
    max_attempts: u32,
    run: RunId,
    status_line: Option<String>,
    recent_errors: Vec<String>,
    dirty: bool,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self::with_max_attempts(DEFAULT_MAX_ATTEMPTS)
    }
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bound of zero is treated as one.
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            phase: Phase::Idle,
            attempt_count: 0,
            max_attempts: max_attempts.max(1),
            run: 0,
            status_line: None,
            recent_errors: Vec::new(),
            dirty: false,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn run(&self) -> RunId {
        self.run
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status_line.as_deref()
    }

    pub fn recent_errors(&self) -> &[String] {
        &self.recent_errors
    }

    /// Handle of the job being polled, if any.
    pub fn handle(&self) -> Option<&JobHandle> {
        match &self.phase {
            Phase::Running(handle) => Some(handle),
            _ => None,
        }
    }

    /// The error a terminal phase represents, if it is not a successful settle.
    pub fn terminal_error(&self) -> Option<MonitorError> {
        match &self.phase {
            Phase::Errored(err) => Some(err.clone()),
            Phase::TimedOut => Some(MonitorError::Timeout {
                attempts: self.attempt_count,
            }),
            _ => None,
        }
    }

    pub fn view(&self) -> MonitorView {
        MonitorView {
            phase: self.phase.clone(),
            attempt_count: self.attempt_count,
            max_attempts: self.max_attempts,
            status_line: self.status_line.clone(),
            recent_errors: self.recent_errors.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_current(&self, run: RunId) -> bool {
        run == self.run
    }

    pub(crate) fn begin_run(&mut self) -> RunId {
        self.run += 1;
        self.phase = Phase::Starting;
        self.attempt_count = 0;
        self.recent_errors.clear();
        self.status_line = Some("starting...".to_string());
        self.dirty = true;
        self.run
    }

    pub(crate) fn enter_running(&mut self, handle: JobHandle) {
        self.status_line = Some(format!("Running - Job ID: {}...", handle.short_id()));
        self.phase = Phase::Running(handle);
        self.dirty = true;
    }

    pub(crate) fn fail_submit(&mut self, message: String) {
        self.status_line = Some(format!("Error: {message}"));
        self.recent_errors.push(format!("[scrape] {message}"));
        self.phase = Phase::Errored(MonitorError::SubmitFailed(message));
        self.dirty = true;
    }

    pub(crate) fn fail_status(&mut self, message: String) {
        self.status_line = Some(format!("Status error: {message}"));
        self.recent_errors.push(format!("[status] {message}"));
        self.phase = Phase::Errored(MonitorError::StatusFailed(message));
        self.dirty = true;
    }

    pub(crate) fn settle(&mut self, outcome: JobOutcome) {
        self.status_line = Some(match &outcome {
            JobOutcome::Completed { leads_qualified } => {
                format!("Done - {leads_qualified} leads qualified")
            }
            JobOutcome::Failed { error_message } => format!("Failed: {error_message}"),
        });
        self.phase = Phase::Settled(outcome);
        self.dirty = true;
    }

    /// Counts a non-terminal poll. Returns true once the bound is reached.
    pub(crate) fn record_pending(&mut self) -> bool {
        self.attempt_count += 1;
        self.dirty = true;
        self.attempt_count >= self.max_attempts
    }

    pub(crate) fn time_out(&mut self) {
        if let Phase::Running(handle) = &self.phase {
            self.recent_errors
                .push(format!("[status] timeout for job {}", handle.short_id()));
        }
        self.status_line = Some(format!(
            "Still running after {} status checks. Reset the session and run again.",
            self.max_attempts
        ));
        self.phase = Phase::TimedOut;
        self.dirty = true;
    }

    /// Back to Idle. The run number is kept so late results stay stale.
    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.attempt_count = 0;
        self.recent_errors.clear();
        self.status_line = Some("Session reset. Run scrape again.".to_string());
        self.dirty = true;
    }
}
