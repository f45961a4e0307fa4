//! Turning a reaped worker into a [`TerminalOutcome`].

use std::process::ExitStatus;

use crate::app::{ErrorCause, TerminalOutcome};
use crate::protocol::{LogTag, ProtocolLine};

/// Tagged lines that matter for the final verdict, collected per stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamMarkers {
    /// Body of the last `[SUCCESS]` line.
    pub success: Option<String>,
    /// Body of the last `[ERROR]` line.
    pub error: Option<String>,
}

impl StreamMarkers {
    pub fn observe(&mut self, line: &ProtocolLine) {
        let ProtocolLine::Log(event) = line else {
            return;
        };
        match event.tag {
            LogTag::Success => self.success = Some(event.body().to_string()),
            LogTag::Error => self.error = Some(event.body().to_string()),
            _ => {}
        }
    }

    /// Fold another stream's markers in; `other` wins where both saw a line.
    pub fn merge(&mut self, other: StreamMarkers) {
        if other.success.is_some() {
            self.success = other.success;
        }
        if other.error.is_some() {
            self.error = other.error;
        }
    }
}

/// How the wait on the worker ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReport {
    Exited {
        code: Option<i32>,
        signal: Option<i32>,
    },
    WaitFailed(String),
}

impl ExitReport {
    pub fn from_status(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;
        ExitReport::Exited {
            code: status.code(),
            signal,
        }
    }

    fn succeeded(&self) -> bool {
        matches!(
            self,
            ExitReport::Exited {
                code: Some(0),
                signal: None
            }
        )
    }
}

/// A recording only succeeds when the worker exits cleanly *and* said so.
pub fn classify_exit(
    report: &ExitReport,
    markers: &StreamMarkers,
    output_path: &str,
) -> TerminalOutcome {
    if let ExitReport::WaitFailed(detail) = report {
        return TerminalOutcome::Failed {
            message: format!("Lost track of the worker: {detail}"),
            cause: ErrorCause::Wait(detail.clone()),
        };
    }

    if report.succeeded() {
        return match markers.success.as_deref() {
            Some(body) if !body.is_empty() => TerminalOutcome::Succeeded {
                message: body.to_string(),
            },
            Some(_) => TerminalOutcome::Succeeded {
                message: format!("Timelapse saved to: {output_path}"),
            },
            None => TerminalOutcome::Failed {
                message: with_detail(
                    "Worker exited without reporting a saved video".to_string(),
                    markers,
                ),
                cause: ErrorCause::MissingSuccess,
            },
        };
    }

    let (code, signal) = match report {
        ExitReport::Exited { code, signal } => (*code, *signal),
        ExitReport::WaitFailed(_) => (None, None),
    };
    let headline = match (code, signal) {
        (Some(code), _) => format!("Recording failed: exit status {code}"),
        (None, Some(signal)) => format!("Recording failed: terminated by signal {signal}"),
        (None, None) => "Recording failed".to_string(),
    };
    TerminalOutcome::Failed {
        message: with_detail(headline, markers),
        cause: ErrorCause::WorkerExit { code, signal },
    }
}

fn with_detail(headline: String, markers: &StreamMarkers) -> String {
    match markers.error.as_deref() {
        Some(detail) if !detail.is_empty() => format!("{headline}: {detail}"),
        _ => headline,
    }
}
