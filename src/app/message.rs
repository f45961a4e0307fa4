use std::fmt;

use crossterm::event::KeyEvent;

use super::form::ValidationError;
use crate::protocol::{LogEvent, ProgressEvent};

/// Everything the dispatch loop can receive on its inbound channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// Raw key press; resolved to a [`super::UserAction`] against the current phase.
    Input(KeyEvent),
    Progress(ProgressEvent),
    Log(LogEvent),
    /// Final word from the supervisor once the worker has been reaped.
    Outcome(TerminalOutcome),
    /// Redraw only; carries no state change.
    Tick,
}

/// How a recording ended.
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalOutcome {
    Succeeded { message: String },
    Failed { message: String, cause: ErrorCause },
}

/// Classified reason for landing in the error phase.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorCause {
    Validation(ValidationError),
    Spawn(String),
    /// Non-zero exit or death by signal.
    WorkerExit {
        code: Option<i32>,
        signal: Option<i32>,
    },
    /// Clean exit without a `[SUCCESS]` line.
    MissingSuccess,
    Wait(String),
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCause::Validation(err) => write!(f, "validation: {err}"),
            ErrorCause::Spawn(detail) => write!(f, "spawn: {detail}"),
            ErrorCause::WorkerExit {
                code: Some(code), ..
            } => write!(f, "worker exited with status {code}"),
            ErrorCause::WorkerExit {
                signal: Some(signal),
                ..
            } => write!(f, "worker terminated by signal {signal}"),
            ErrorCause::WorkerExit { .. } => write!(f, "worker exited abnormally"),
            ErrorCause::MissingSuccess => write!(f, "worker exited without a success report"),
            ErrorCause::Wait(detail) => write!(f, "wait: {detail}"),
        }
    }
}
