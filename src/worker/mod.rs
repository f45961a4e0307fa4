//! Spawning and supervising the external capture worker.
//!
//! One recording owns exactly one child process, two stream reader threads
//! and one waiter thread. The waiter owns the child, reaps it, collects what
//! the readers saw and posts a single [`Message::Outcome`] after every line
//! from both streams has been forwarded.

mod outcome;
mod signal;
mod supervisor;
#[cfg(test)]
mod tests;

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::Sender;

use crate::app::{Message, SessionConfig};
use crate::config::WorkerSettings;
use crate::log_debug;

pub use outcome::{classify_exit, ExitReport, StreamMarkers};
pub use supervisor::worker_args;

/// Seam between the session state machine and process management.
pub trait WorkerLauncher: Send {
    /// Start a worker for `config`. Progress, log and outcome messages flow to
    /// `events`; the outcome is sent exactly once, after the child is reaped.
    fn start(
        &self,
        config: &SessionConfig,
        events: Sender<Message>,
    ) -> Result<WorkerHandle, SpawnError>;
}

/// Launches the configured worker program as a child process.
#[derive(Debug, Clone)]
pub struct ProcessLauncher {
    settings: WorkerSettings,
}

impl ProcessLauncher {
    pub fn new(settings: WorkerSettings) -> Self {
        Self { settings }
    }
}

impl WorkerLauncher for ProcessLauncher {
    fn start(
        &self,
        config: &SessionConfig,
        events: Sender<Message>,
    ) -> Result<WorkerHandle, SpawnError> {
        supervisor::spawn_worker(&self.settings, config, events)
    }
}

/// Why a worker could not be started.
#[derive(Debug)]
pub enum SpawnError {
    Spawn { program: String, source: io::Error },
    Pipe(&'static str),
    Thread(io::Error),
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::Spawn { program, source } => {
                write!(f, "Failed to start worker `{program}`: {source}")
            }
            SpawnError::Pipe(stream) => write!(f, "Failed to capture worker {stream}"),
            SpawnError::Thread(err) => write!(f, "Failed to start supervisor thread: {err}"),
        }
    }
}

impl std::error::Error for SpawnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpawnError::Spawn { source, .. } => Some(source),
            SpawnError::Thread(err) => Some(err),
            SpawnError::Pipe(_) => None,
        }
    }
}

/// Opaque reference to a running worker, held only while recording.
pub struct WorkerHandle {
    pid: Option<u32>,
    waiter: Option<JoinHandle<()>>,
    reaped: Arc<AtomicBool>,
    stop_requests: usize,
}

impl WorkerHandle {
    pub(crate) fn new(pid: u32, waiter: JoinHandle<()>, reaped: Arc<AtomicBool>) -> Self {
        Self {
            pid: Some(pid),
            waiter: Some(waiter),
            reaped,
            stop_requests: 0,
        }
    }

    /// Handle with no process behind it, for driving the state machine in tests.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        Self {
            pid: None,
            waiter: None,
            reaped: Arc::new(AtomicBool::new(false)),
            stop_requests: 0,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Deliver the cooperative stop signal to the worker's process group.
    /// Still sent after the worker itself exited, since helpers it forked may
    /// outlive it. Never escalates to a forced kill.
    pub fn request_stop(&mut self) -> bool {
        self.stop_requests += 1;
        match self.pid {
            Some(pid) => {
                tracing::info!(pid, "stop requested");
                signal::interrupt_group(pid)
            }
            None => false,
        }
    }

    pub fn stop_requests(&self) -> usize {
        self.stop_requests
    }

    /// Join the waiter thread. Call only after its outcome arrived, so this never blocks long.
    pub fn finish(mut self) {
        if let Some(waiter) = self.waiter.take() {
            if waiter.join().is_err() {
                log_debug("worker: waiter thread panicked");
            }
        }
    }
}

impl fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("pid", &self.pid)
            .field("reaped", &self.reaped.load(Ordering::SeqCst))
            .field("stop_requests", &self.stop_requests)
            .finish()
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // Dropped mid-recording (UI error path): the waiter still reaps the
        // child, so only make sure the worker is told to stop.
        if self.waiter.is_some() && !self.reaped.load(Ordering::SeqCst) && self.stop_requests == 0
        {
            if let Some(pid) = self.pid {
                log_debug("worker: handle dropped while running; sending stop");
                signal::interrupt_group(pid);
            }
        }
    }
}
