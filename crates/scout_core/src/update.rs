use scout_logging::{scout_debug, scout_info, scout_warn};

use crate::{Effect, JobOutcome, JobStatus, MonitorState, Msg, Phase, RunId};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: MonitorState, msg: Msg) -> (MonitorState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested(request) => {
            if state.phase().is_busy() {
                scout_debug!("start ignored while {}", state.phase());
                return (state, Vec::new());
            }
            if state.phase().is_terminal() {
                // A new job starts from a clean session.
                state.reset();
            }
            let run = state.begin_run();
            scout_info!(
                "run {} starting: query={:?} city={:?} country={:?} max_results={}",
                run,
                request.query(),
                request.city(),
                request.country(),
                request.max_results()
            );
            vec![Effect::SubmitJob { run, request }]
        }
        Msg::SubmitFinished { run, result } => {
            if !accepts(&state, run, |phase| matches!(phase, Phase::Starting)) {
                return (state, Vec::new());
            }
            match result {
                Ok(handle) => {
                    scout_info!("run {} accepted as job {}", run, handle);
                    state.enter_running(handle);
                    vec![Effect::ArmPollTimer { run }]
                }
                Err(message) => {
                    scout_warn!("run {} submit failed: {}", run, message);
                    state.fail_submit(message);
                    Vec::new()
                }
            }
        }
        Msg::PollDue { run } => {
            if !accepts(&state, run, |phase| matches!(phase, Phase::Running(_))) {
                return (state, Vec::new());
            }
            match state.handle() {
                Some(handle) => vec![Effect::QueryStatus {
                    run,
                    handle: handle.clone(),
                }],
                None => Vec::new(),
            }
        }
        Msg::StatusReceived { run, result } => {
            if !accepts(&state, run, |phase| matches!(phase, Phase::Running(_))) {
                return (state, Vec::new());
            }
            apply_status(&mut state, run, result)
        }
        Msg::ResetRequested => {
            scout_info!("session reset from {}", state.phase());
            state.reset();
            vec![Effect::DisarmPollTimer]
        }
    };

    (state, effects)
}

fn apply_status(
    state: &mut MonitorState,
    run: RunId,
    result: Result<JobStatus, String>,
) -> Vec<Effect> {
    match result {
        Err(message) => {
            scout_warn!(
                "run {} status check {} failed: {}",
                run,
                state.attempt_count() + 1,
                message
            );
            state.fail_status(message);
        }
        Ok(JobStatus::Completed { leads_qualified }) => {
            scout_info!("run {} completed: {} leads qualified", run, leads_qualified);
            state.settle(JobOutcome::Completed { leads_qualified });
        }
        Ok(JobStatus::Failed { error_message }) => {
            scout_warn!("run {} failed remotely: {}", run, error_message);
            state.settle(JobOutcome::Failed { error_message });
        }
        Ok(JobStatus::Pending | JobStatus::Running) => {
            if !state.record_pending() {
                scout_debug!(
                    "run {} still in progress ({}/{})",
                    run,
                    state.attempt_count(),
                    state.max_attempts()
                );
                return vec![Effect::ArmPollTimer { run }];
            }
            scout_warn!(
                "run {} timed out after {} status checks",
                run,
                state.attempt_count()
            );
            state.time_out();
        }
    }
    vec![Effect::DisarmPollTimer]
}

/// Whether a run-tagged message still applies to the current state.
fn accepts(state: &MonitorState, run: RunId, phase_ok: impl Fn(&Phase) -> bool) -> bool {
    if state.is_current(run) && phase_ok(state.phase()) {
        return true;
    }
    scout_debug!(
        "dropping stale message for run {} (current run {}, {})",
        run,
        state.run(),
        state.phase()
    );
    false
}
