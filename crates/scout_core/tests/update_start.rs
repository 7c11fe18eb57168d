use std::sync::Once;

use pretty_assertions::assert_eq;
use scout_core::{
    update, Effect, JobHandle, JobRequest, MaxResults, MonitorError, MonitorState, Msg, Phase,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scout_logging::initialize_for_tests);
}

fn request() -> JobRequest {
    JobRequest::new("dentists", "Lahore", "Pakistan", MaxResults::Twenty)
}

#[test]
fn start_from_idle_submits_once() {
    init_logging();
    let (mut state, effects) = update(MonitorState::new(), Msg::StartRequested(request()));

    assert_eq!(state.phase(), &Phase::Starting);
    assert_eq!(state.status_line(), Some("starting..."));
    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            run: 1,
            request: request(),
        }]
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn start_while_starting_is_ignored() {
    init_logging();
    let (mut state, _) = update(MonitorState::new(), Msg::StartRequested(request()));
    state.consume_dirty();
    let before = state.clone();

    let (mut next, effects) = update(state, Msg::StartRequested(request()));

    assert_eq!(next, before);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn start_while_running_is_ignored() {
    init_logging();
    let (state, _) = update(MonitorState::new(), Msg::StartRequested(request()));
    let (state, _) = update(
        state,
        Msg::SubmitFinished {
            run: 1,
            result: Ok(JobHandle::new("job-1")),
        },
    );
    let before = state.clone();

    let (next, effects) = update(state, Msg::StartRequested(request()));

    assert_eq!(next, before);
    assert!(effects.is_empty());
}

#[test]
fn submit_success_arms_the_timer() {
    init_logging();
    let (state, _) = update(MonitorState::new(), Msg::StartRequested(request()));
    let (state, effects) = update(
        state,
        Msg::SubmitFinished {
            run: 1,
            result: Ok(JobHandle::new("0123456789abcdef")),
        },
    );

    assert_eq!(
        state.phase(),
        &Phase::Running(JobHandle::new("0123456789abcdef"))
    );
    assert_eq!(state.status_line(), Some("Running - Job ID: 01234567..."));
    assert_eq!(effects, vec![Effect::ArmPollTimer { run: 1 }]);
}

#[test]
fn submit_failure_errors_without_timer() {
    init_logging();
    let (state, _) = update(MonitorState::new(), Msg::StartRequested(request()));
    let (state, effects) = update(
        state,
        Msg::SubmitFinished {
            run: 1,
            result: Err("HTTP 502: bad gateway".to_string()),
        },
    );

    assert_eq!(
        state.phase(),
        &Phase::Errored(MonitorError::SubmitFailed(
            "HTTP 502: bad gateway".to_string()
        ))
    );
    assert_eq!(state.status_line(), Some("Error: HTTP 502: bad gateway"));
    assert_eq!(state.recent_errors(), ["[scrape] HTTP 502: bad gateway"]);
    assert!(effects.is_empty());
}

#[test]
fn start_after_terminal_phase_begins_a_fresh_run() {
    init_logging();
    let (state, _) = update(MonitorState::new(), Msg::StartRequested(request()));
    let (state, _) = update(
        state,
        Msg::SubmitFinished {
            run: 1,
            result: Err("offline".to_string()),
        },
    );

    let (state, effects) = update(state, Msg::StartRequested(request()));

    assert_eq!(state.phase(), &Phase::Starting);
    assert_eq!(state.run(), 2);
    assert!(state.recent_errors().is_empty());
    assert_eq!(
        effects,
        vec![Effect::SubmitJob {
            run: 2,
            request: request(),
        }]
    );
}

#[test]
fn submit_result_after_reset_is_dropped() {
    init_logging();
    let (state, _) = update(MonitorState::new(), Msg::StartRequested(request()));
    let (state, effects) = update(state, Msg::ResetRequested);
    assert_eq!(effects, vec![Effect::DisarmPollTimer]);

    let (state, effects) = update(
        state,
        Msg::SubmitFinished {
            run: 1,
            result: Ok(JobHandle::new("late")),
        },
    );

    assert_eq!(state.phase(), &Phase::Idle);
    assert!(effects.is_empty());
}
