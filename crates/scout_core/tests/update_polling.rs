use pretty_assertions::assert_eq;
use scout_core::{
    update, Effect, JobHandle, JobOutcome, JobRequest, JobStatus, MaxResults, MonitorError,
    MonitorState, Msg, Phase, DEFAULT_MAX_ATTEMPTS,
};

fn running(state: MonitorState) -> MonitorState {
    let request = JobRequest::new("roofers", "Karachi", "Pakistan", MaxResults::Fifty);
    let (state, _) = update(state, Msg::StartRequested(request));
    let run = state.run();
    let (state, _) = update(
        state,
        Msg::SubmitFinished {
            run,
            result: Ok(JobHandle::new("abcdef0123456789")),
        },
    );
    state
}

fn poll(state: MonitorState, result: Result<JobStatus, String>) -> (MonitorState, Vec<Effect>) {
    let run = state.run();
    let (state, effects) = update(state, Msg::PollDue { run });
    assert_eq!(
        effects,
        vec![Effect::QueryStatus {
            run,
            handle: JobHandle::new("abcdef0123456789"),
        }]
    );
    update(state, Msg::StatusReceived { run, result })
}

#[test]
fn completed_status_settles_and_disarms() {
    let state = running(MonitorState::new());
    let (state, effects) = poll(state, Ok(JobStatus::Completed { leads_qualified: 7 }));

    assert_eq!(
        state.phase(),
        &Phase::Settled(JobOutcome::Completed { leads_qualified: 7 })
    );
    assert_eq!(state.status_line(), Some("Done - 7 leads qualified"));
    assert_eq!(state.handle(), None);
    assert_eq!(state.terminal_error(), None);
    assert_eq!(effects, vec![Effect::DisarmPollTimer]);
}

#[test]
fn failed_status_settles_with_message() {
    let state = running(MonitorState::new());
    let (state, effects) = poll(
        state,
        Ok(JobStatus::Failed {
            error_message: "quota exceeded".to_string(),
        }),
    );

    assert_eq!(
        state.phase(),
        &Phase::Settled(JobOutcome::Failed {
            error_message: "quota exceeded".to_string()
        })
    );
    assert_eq!(state.status_line(), Some("Failed: quota exceeded"));
    assert_eq!(effects, vec![Effect::DisarmPollTimer]);
}

#[test]
fn pending_rearms_until_the_bound() {
    let mut state = running(MonitorState::new());
    for attempt in 1..DEFAULT_MAX_ATTEMPTS {
        let (next, effects) = poll(state, Ok(JobStatus::Pending));
        assert_eq!(next.attempt_count(), attempt);
        assert!(matches!(next.phase(), Phase::Running(_)));
        assert_eq!(effects, vec![Effect::ArmPollTimer { run: 1 }]);
        state = next;
    }

    let (state, effects) = poll(state, Ok(JobStatus::Running));

    assert_eq!(state.phase(), &Phase::TimedOut);
    assert_eq!(state.attempt_count(), DEFAULT_MAX_ATTEMPTS);
    assert_eq!(
        state.terminal_error(),
        Some(MonitorError::Timeout {
            attempts: DEFAULT_MAX_ATTEMPTS
        })
    );
    assert_eq!(state.recent_errors(), ["[status] timeout for job abcdef01"]);
    assert_eq!(effects, vec![Effect::DisarmPollTimer]);
}

#[test]
fn transport_error_on_fifth_poll_is_terminal() {
    let mut state = running(MonitorState::new());
    for _ in 0..4 {
        let (next, _) = poll(state, Ok(JobStatus::Pending));
        state = next;
    }

    let (state, effects) = poll(state, Err("Status HTTP 500".to_string()));

    assert_eq!(
        state.phase(),
        &Phase::Errored(MonitorError::StatusFailed("Status HTTP 500".to_string()))
    );
    assert_eq!(state.attempt_count(), 4);
    assert_eq!(state.status_line(), Some("Status error: Status HTTP 500"));
    assert_eq!(state.recent_errors(), ["[status] Status HTTP 500"]);
    assert_eq!(effects, vec![Effect::DisarmPollTimer]);
}

#[test]
fn custom_bound_times_out_on_that_poll() {
    let state = running(MonitorState::with_max_attempts(2));
    let (state, effects) = poll(state, Ok(JobStatus::Pending));
    assert_eq!(effects, vec![Effect::ArmPollTimer { run: 1 }]);

    let (state, _) = poll(state, Ok(JobStatus::Pending));
    assert_eq!(state.phase(), &Phase::TimedOut);
}

#[test]
fn reset_from_running_returns_to_idle() {
    let state = running(MonitorState::new());
    let (state, _) = poll(state, Ok(JobStatus::Pending));

    let (state, effects) = update(state, Msg::ResetRequested);

    assert_eq!(state.phase(), &Phase::Idle);
    assert_eq!(state.attempt_count(), 0);
    assert_eq!(state.handle(), None);
    assert_eq!(state.status_line(), Some("Session reset. Run scrape again."));
    assert_eq!(effects, vec![Effect::DisarmPollTimer]);

    // A timer that already fired before the reset is ignored.
    let (state, effects) = update(state, Msg::PollDue { run: 1 });
    assert_eq!(state.phase(), &Phase::Idle);
    assert!(effects.is_empty());
}

#[test]
fn late_status_from_previous_run_is_dropped() {
    let state = running(MonitorState::new());
    let (state, _) = update(state, Msg::ResetRequested);
    let state = running(state);
    assert_eq!(state.run(), 2);

    let (state, effects) = update(
        state,
        Msg::StatusReceived {
            run: 1,
            result: Ok(JobStatus::Completed { leads_qualified: 3 }),
        },
    );

    assert!(matches!(state.phase(), Phase::Running(_)));
    assert!(effects.is_empty());
}

#[test]
fn view_reflects_controls() {
    let view = MonitorState::new().view();
    assert!(view.can_start());
    assert!(!view.can_reset());

    let view = running(MonitorState::new()).view();
    assert!(!view.can_start());
    assert!(view.can_reset());
    assert!(view.dirty);
}

fn assert_reset_to_idle(state: MonitorState) {
    let (state, effects) = update(state, Msg::ResetRequested);

    assert_eq!(state.phase(), &Phase::Idle);
    assert_eq!(state.attempt_count(), 0);
    assert_eq!(state.handle(), None);
    assert!(state.recent_errors().is_empty());
    assert_eq!(effects, vec![Effect::DisarmPollTimer]);

    let run = state.run();
    let request = JobRequest::new("bakeries", "Quetta", "Pakistan", MaxResults::Twenty);
    let (state, effects) = update(state, Msg::StartRequested(request.clone()));
    assert_eq!(state.phase(), &Phase::Starting);
    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            run: run + 1,
            request
        }]
    );
}

#[test]
fn reset_from_idle_stays_idle() {
    assert_reset_to_idle(MonitorState::new());
}

#[test]
fn reset_from_settled_returns_to_idle() {
    let (state, _) = poll(
        running(MonitorState::new()),
        Ok(JobStatus::Completed { leads_qualified: 2 }),
    );
    assert!(matches!(state.phase(), Phase::Settled(_)));
    assert_reset_to_idle(state);
}

#[test]
fn reset_from_timed_out_returns_to_idle() {
    let state = running(MonitorState::with_max_attempts(2));
    let (state, _) = poll(state, Ok(JobStatus::Running));
    let (state, _) = poll(state, Ok(JobStatus::Pending));
    assert_eq!(state.phase(), &Phase::TimedOut);
    assert_eq!(state.attempt_count(), 2);
    assert_reset_to_idle(state);
}

#[test]
fn reset_from_status_error_returns_to_idle() {
    let (state, _) = poll(running(MonitorState::new()), Err("HTTP 502".to_string()));
    assert!(matches!(state.phase(), Phase::Errored(_)));
    assert_reset_to_idle(state);
}

#[test]
fn reset_from_submit_error_returns_to_idle() {
    let request = JobRequest::new("roofers", "Karachi", "Pakistan", MaxResults::Fifty);
    let (state, _) = update(MonitorState::new(), Msg::StartRequested(request));
    let run = state.run();
    let (state, _) = update(
        state,
        Msg::SubmitFinished {
            run,
            result: Err("connection refused".to_string()),
        },
    );
    assert_eq!(
        state.phase(),
        &Phase::Errored(MonitorError::SubmitFailed("connection refused".to_string()))
    );
    assert_reset_to_idle(state);
}
