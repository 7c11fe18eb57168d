use crate::Phase;

/// Read-only snapshot of the monitor for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MonitorView {
    pub phase: Phase,
    pub attempt_count: u32,
    pub max_attempts: u32,
    pub status_line: Option<String>,
    pub recent_errors: Vec<String>,
    pub dirty: bool,
}

impl MonitorView {
    /// Whether a reset control should be offered.
    pub fn can_reset(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Whether a new scrape can be launched right now.
    pub fn can_start(&self) -> bool {
        !self.phase.is_busy()
    }
}
