//! Structured JSON event log for worker lifecycle and session transitions.

use crate::config::AppConfig;
use std::env;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing_subscriber::fmt::time::UtcTime;

static TRACING_READY: OnceLock<bool> = OnceLock::new();

/// `CHRONAPSE_TRACE_LOG` overrides the default location under the temp dir.
pub(crate) fn trace_log_path() -> PathBuf {
    env::var_os("CHRONAPSE_TRACE_LOG")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("chronapse_trace.jsonl"))
}

/// Install the global JSON subscriber when file logging is on. Returns whether
/// events are being recorded.
pub fn init_tracing(config: &AppConfig) -> bool {
    if !config.logs || config.no_logs {
        return false;
    }

    *TRACING_READY.get_or_init(|| {
        let path = trace_log_path();
        let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
            crate::log_debug(&format!("trace log unavailable at {}", path.display()));
            return false;
        };
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_timer(UtcTime::rfc_3339())
            .with_writer(file)
            .with_target(true)
            .with_current_span(false)
            .with_span_list(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber).is_ok()
    })
}
