use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use scout_core::{
    update, Effect, JobHandle, JobRequest, MonitorError, MonitorState, Msg, Phase, RunId,
    DEFAULT_MAX_ATTEMPTS,
};
use scout_logging::{scout_debug, scout_warn};

use crate::JobService;

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub poll_interval: Duration,
    pub max_attempts: u32,
    /// Upper bound on the submit call, whatever the service does.
    pub submit_timeout: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            submit_timeout: Duration::from_secs(30),
        }
    }
}

type StartReply = oneshot::Sender<Result<JobHandle, MonitorError>>;

enum Command {
    Start { request: JobRequest, reply: StartReply },
    Reset { reply: oneshot::Sender<()> },
}

/// Handle to a monitor task that owns one scrape job at a time.
///
/// The task applies every command, timer expiry and service result through
/// [`scout_core::update`] one at a time, so transitions never interleave.
#[derive(Clone)]
pub struct ScrapeJobMonitor {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<MonitorState>,
}

impl ScrapeJobMonitor {
    /// Spawns the monitor task on the current tokio runtime.
    pub fn spawn(service: Arc<dyn JobService>, settings: MonitorSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let state = MonitorState::with_max_attempts(settings.max_attempts);
        let (state_tx, state_rx) = watch::channel(state.clone());

        let actor = MonitorActor {
            service,
            settings,
            state,
            msg_tx,
            state_tx,
            timer: None,
            in_flight: None,
            pending_start: None,
        };
        tokio::spawn(actor.run(cmd_rx, msg_rx));

        Self { cmd_tx, state_rx }
    }

    /// Submits `request` and resolves once the service accepted or refused it.
    ///
    /// Fails with [`MonitorError::AlreadyRunning`] while a job is starting or
    /// running, leaving the monitor untouched.
    pub async fn start(&self, request: JobRequest) -> Result<JobHandle, MonitorError> {
        let (reply, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Start { request, reply })
            .map_err(|_| MonitorError::Stopped)?;
        rx.await.map_err(|_| MonitorError::Stopped)?
    }

    /// Returns to Idle. No poll fires for the previous run once this resolves.
    pub async fn reset(&self) {
        let (reply, rx) = oneshot::channel();
        if self.cmd_tx.send(Command::Reset { reply }).is_err() {
            scout_warn!("reset ignored: monitor stopped");
            return;
        }
        let _ = rx.await;
    }

    pub fn current_phase(&self) -> MonitorState {
        self.state_rx.borrow().clone()
    }

    /// Receiver that observes every published state change.
    pub fn subscribe(&self) -> watch::Receiver<MonitorState> {
        self.state_rx.clone()
    }

    /// Waits until no job is starting or running and returns that state.
    pub async fn finished(&self) -> Result<MonitorState, MonitorError> {
        let mut rx = self.state_rx.clone();
        let state = rx
            .wait_for(|state| !state.phase().is_busy())
            .await
            .map_err(|_| MonitorError::Stopped)?;
        Ok(state.clone())
    }
}

struct MonitorActor {
    service: Arc<dyn JobService>,
    settings: MonitorSettings,
    state: MonitorState,
    msg_tx: mpsc::UnboundedSender<Msg>,
    state_tx: watch::Sender<MonitorState>,
    timer: Option<JoinHandle<()>>,
    in_flight: Option<JoinHandle<()>>,
    pending_start: Option<(RunId, StartReply)>,
}

impl MonitorActor {
    async fn run(
        mut self,
        mut cmd_rx: mpsc::UnboundedReceiver<Command>,
        mut msg_rx: mpsc::UnboundedReceiver<Msg>,
    ) {
        loop {
            tokio::select! {
                command = cmd_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(msg) = msg_rx.recv() => self.dispatch(msg),
            }
        }
        scout_debug!("monitor handles dropped; shutting down");
        self.disarm();
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Start { request, reply } => {
                if self.state.phase().is_busy() {
                    let _ = reply.send(Err(MonitorError::AlreadyRunning));
                    return;
                }
                self.dispatch(Msg::StartRequested(request));
                // Answered once the run leaves Starting.
                self.pending_start = Some((self.state.run(), reply));
            }
            Command::Reset { reply } => {
                self.dispatch(Msg::ResetRequested);
                let _ = reply.send(());
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        for effect in effects {
            self.execute(effect);
        }
        if self.state.consume_dirty() {
            self.state_tx.send_replace(self.state.clone());
        }
        self.answer_pending_start();
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::SubmitJob { run, request } => {
                let service = self.service.clone();
                let msg_tx = self.msg_tx.clone();
                let limit = self.settings.submit_timeout;
                self.replace_in_flight(tokio::spawn(async move {
                    let submitted = tokio::time::timeout(limit, service.submit(&request)).await;
                    let result = match submitted {
                        Ok(result) => result.map_err(|err| err.to_string()),
                        Err(_) => Err(format!("submit timed out after {}s", limit.as_secs())),
                    };
                    let _ = msg_tx.send(Msg::SubmitFinished { run, result });
                }));
            }
            Effect::ArmPollTimer { run } => {
                let msg_tx = self.msg_tx.clone();
                let interval = self.settings.poll_interval;
                if let Some(timer) = self.timer.take() {
                    timer.abort();
                }
                self.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(interval).await;
                    let _ = msg_tx.send(Msg::PollDue { run });
                }));
            }
            Effect::QueryStatus { run, handle } => {
                // The timer that produced this poll has already fired.
                self.timer = None;
                let service = self.service.clone();
                let msg_tx = self.msg_tx.clone();
                self.replace_in_flight(tokio::spawn(async move {
                    let result = service
                        .status(&handle)
                        .await
                        .map_err(|err| err.to_string());
                    let _ = msg_tx.send(Msg::StatusReceived { run, result });
                }));
            }
            Effect::DisarmPollTimer => self.disarm(),
        }
    }

    fn replace_in_flight(&mut self, task: JoinHandle<()>) {
        if let Some(previous) = self.in_flight.replace(task) {
            previous.abort();
        }
    }

    fn disarm(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
    }

    fn answer_pending_start(&mut self) {
        let still_starting = match &self.pending_start {
            Some((run, _)) => {
                *run == self.state.run() && matches!(self.state.phase(), Phase::Starting)
            }
            None => return,
        };
        if still_starting {
            return;
        }
        let Some((_, reply)) = self.pending_start.take() else {
            return;
        };
        let answer = match self.state.phase() {
            Phase::Running(handle) => Ok(handle.clone()),
            Phase::Errored(err) => Err(err.clone()),
            _ => Err(MonitorError::Cancelled),
        };
        let _ = reply.send(answer);
    }
}
