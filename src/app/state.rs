use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use super::form::{MenuForm, SessionConfig};
use super::keymap::{action_for, UserAction};
use super::log_ring::LogRing;
use super::message::{ErrorCause, Message, TerminalOutcome};
use crate::config::MenuPrefill;
use crate::protocol::ProgressEvent;
use crate::worker::{WorkerHandle, WorkerLauncher};
use crate::{log_debug, log_debug_content};

macro_rules! state_change {
    ($self:expr, $body:block) => {{
        $body
        $self.request_redraw();
    }};
}

/// Live data for an in-flight recording.
#[derive(Debug)]
pub struct Recording {
    pub config: SessionConfig,
    pub started_at: Instant,
    pub last_progress: Option<ProgressEvent>,
    pub recent_logs: LogRing,
    /// Set once the stop signal went out; the phase itself does not change.
    pub stop_requested: bool,
    worker: WorkerHandle,
}

impl Recording {
    pub fn worker(&self) -> &WorkerHandle {
        &self.worker
    }

    pub fn frames_captured(&self) -> u64 {
        self.last_progress.map(|event| event.current).unwrap_or(0)
    }

    /// A report is applied only if it is internally consistent and does not move backwards.
    fn accepts(&self, event: &ProgressEvent) -> bool {
        if event.total > 0 && event.current > event.total {
            return false;
        }
        match self.last_progress {
            Some(last) => event.current >= last.current,
            None => true,
        }
    }

    fn finish(self, outcome: TerminalOutcome) -> Phase {
        let elapsed = self.started_at.elapsed();
        let frames_captured = self.frames_captured();
        // The outcome is posted after the child was reaped; joining is immediate.
        self.worker.finish();
        match outcome {
            TerminalOutcome::Succeeded { message } => Phase::Completed(Completed {
                elapsed,
                frames_captured,
                message,
            }),
            TerminalOutcome::Failed { message, cause } => {
                log_debug(&format!("recording failed: {cause}"));
                Phase::Error(Failure { message, cause })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    pub elapsed: Duration,
    pub frames_captured: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub message: String,
    pub cause: ErrorCause,
}

#[derive(Debug)]
pub enum Phase {
    Menu(MenuForm),
    Recording(Recording),
    Completed(Completed),
    Error(Failure),
}

/// Discriminant of [`Phase`], used for key resolution and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseKind {
    Menu,
    Recording,
    Completed,
    Error,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Menu(_) => PhaseKind::Menu,
            Phase::Recording(_) => PhaseKind::Recording,
            Phase::Completed(_) => PhaseKind::Completed,
            Phase::Error(_) => PhaseKind::Error,
        }
    }
}

/// Single owner of session state. Every change goes through [`Session::apply`].
pub struct Session {
    phase: Phase,
    launcher: Box<dyn WorkerLauncher>,
    events: Sender<Message>,
    log_capacity: usize,
    quit_requested: bool,
    needs_redraw: bool,
}

impl Session {
    /// `events` is the sending half of the loop's inbound channel; workers report through it.
    pub fn new(
        prefill: &MenuPrefill,
        launcher: Box<dyn WorkerLauncher>,
        events: Sender<Message>,
        log_capacity: usize,
    ) -> Self {
        Self {
            phase: Phase::Menu(MenuForm::new(prefill)),
            launcher,
            events,
            log_capacity,
            quit_requested: false,
            needs_redraw: true,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn should_quit(&self) -> bool {
        self.quit_requested
    }

    pub fn apply(&mut self, message: Message) {
        match message {
            Message::Input(key) => {
                if let Some(action) = action_for(self.phase.kind(), key) {
                    self.handle_action(action);
                }
            }
            Message::Progress(event) => self.apply_progress(event),
            Message::Log(event) => match &mut self.phase {
                Phase::Recording(recording) => state_change!(self, {
                    log_debug_content(&format!("worker line: {}", event.text));
                    recording.recent_logs.push(event);
                }),
                other => log_debug(&format!("dropping log line outside recording ({:?})", other.kind())),
            },
            Message::Outcome(outcome) => self.apply_outcome(outcome),
            Message::Tick => {
                // Spinner and elapsed time are derived from the clock at draw time.
                if matches!(self.phase, Phase::Recording(_)) {
                    self.request_redraw();
                }
            }
        }
    }

    pub fn handle_action(&mut self, action: UserAction) {
        let kind = self.phase.kind();
        match &mut self.phase {
            Phase::Menu(form) => match action {
                UserAction::NextField => state_change!(self, { form.focus_next() }),
                UserAction::PrevField => state_change!(self, { form.focus_prev() }),
                UserAction::Insert(ch) => {
                    if form.push_char(ch) {
                        self.request_redraw();
                    }
                }
                UserAction::Backspace => {
                    if form.backspace() {
                        self.request_redraw();
                    }
                }
                UserAction::Submit => self.start_recording(),
                UserAction::Quit => self.quit_requested = true,
                UserAction::Cancel => log_debug("ignoring Cancel in Menu"),
            },
            Phase::Recording(recording) => {
                if action != UserAction::Cancel {
                    log_debug(&format!("ignoring {action:?} while recording"));
                    return;
                }
                if recording.stop_requested {
                    log_debug("stop already requested; waiting for worker");
                    return;
                }
                state_change!(self, {
                    recording.stop_requested = true;
                    if !recording.worker.request_stop() {
                        log_debug("stop signal was not delivered");
                    }
                })
            }
            Phase::Completed(_) | Phase::Error(_) => {
                if action == UserAction::Quit {
                    self.quit_requested = true;
                } else {
                    log_debug(&format!("ignoring {action:?} in {kind:?}"));
                }
            }
        }
    }

    fn start_recording(&mut self) {
        let Phase::Menu(form) = &self.phase else {
            return;
        };
        let config = match form.submit() {
            Ok(config) => config,
            Err(err) => {
                log_debug(&format!("menu rejected: {err}"));
                state_change!(self, {
                    self.phase = Phase::Error(Failure {
                        message: err.to_string(),
                        cause: ErrorCause::Validation(err),
                    });
                });
                return;
            }
        };

        match self.launcher.start(&config, self.events.clone()) {
            Ok(worker) => {
                tracing::info!(
                    interval = config.interval_secs,
                    duration = config.duration_secs,
                    "recording started"
                );
                state_change!(self, {
                    self.phase = Phase::Recording(Recording {
                        config,
                        started_at: Instant::now(),
                        last_progress: None,
                        recent_logs: LogRing::new(self.log_capacity),
                        stop_requested: false,
                        worker,
                    });
                });
            }
            Err(err) => {
                tracing::warn!(error = %err, "worker failed to start");
                log_debug(&format!("spawn failed: {err}"));
                state_change!(self, {
                    self.phase = Phase::Error(Failure {
                        message: err.to_string(),
                        cause: ErrorCause::Spawn(err.to_string()),
                    });
                });
            }
        }
    }

    fn apply_progress(&mut self, event: ProgressEvent) {
        let Phase::Recording(recording) = &mut self.phase else {
            log_debug("dropping progress outside recording");
            return;
        };
        if !recording.accepts(&event) {
            log_debug(&format!(
                "rejected progress {}/{} (last {:?})",
                event.current,
                event.total,
                recording.last_progress.map(|last| last.current)
            ));
            return;
        }
        state_change!(self, {
            recording.last_progress = Some(event);
        });
    }

    fn apply_outcome(&mut self, outcome: TerminalOutcome) {
        if !matches!(self.phase, Phase::Recording(_)) {
            log_debug(&format!(
                "dropping late outcome in {:?}",
                self.phase.kind()
            ));
            return;
        }
        let previous = std::mem::replace(&mut self.phase, Phase::Menu(MenuForm::default()));
        if let Phase::Recording(recording) = previous {
            state_change!(self, {
                self.phase = recording.finish(outcome);
            });
            tracing::info!(phase = ?self.phase.kind(), "recording finished");
        }
    }

    pub(crate) fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub(crate) fn take_redraw_request(&mut self) -> bool {
        let requested = self.needs_redraw;
        self.needs_redraw = false;
        requested
    }
}
