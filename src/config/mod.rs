//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;

use crate::ui::Theme;
pub use defaults::{
    DEFAULT_CAMERA_INDEX, DEFAULT_DURATION_SECS, DEFAULT_FPS, DEFAULT_INTERVAL_SECS,
    DEFAULT_LOG_CAPACITY, DEFAULT_OUTPUT_PATH, DEFAULT_TICK_MS, DEFAULT_WORKER_CMD,
};

/// CLI options for the Chronapse TUI. Validated values keep the worker invocation safe.
#[derive(Debug, Parser, Clone)]
#[command(about = "Chronapse timelapse recorder TUI", author, version)]
pub struct AppConfig {
    /// Worker command line; interval, duration and output flags are appended
    #[arg(long = "worker-cmd", env = "CHRONAPSE_WORKER_CMD", default_value = DEFAULT_WORKER_CMD)]
    pub worker_cmd: String,

    /// Pre-fill the interval field (seconds between frames)
    #[arg(long)]
    pub interval: Option<f64>,

    /// Pre-fill the duration field (total recording seconds)
    #[arg(long)]
    pub duration: Option<f64>,

    /// Pre-fill the output file field
    #[arg(long)]
    pub output: Option<String>,

    /// Output video frame rate forwarded to the worker
    #[arg(long, default_value_t = DEFAULT_FPS)]
    pub fps: u32,

    /// Camera device index forwarded to the worker
    #[arg(long, default_value_t = DEFAULT_CAMERA_INDEX)]
    pub camera: u32,

    /// Color palette for the interface
    #[arg(long, value_enum, default_value_t = Theme::Violet)]
    pub theme: Theme,

    /// Redraw cadence while idle (milliseconds)
    #[arg(long = "tick-ms", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Number of recent worker lines kept on screen
    #[arg(long = "log-capacity", default_value_t = DEFAULT_LOG_CAPACITY)]
    pub log_capacity: usize,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "CHRONAPSE_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "CHRONAPSE_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow worker output text in the debug log
    #[arg(
        long = "log-content",
        env = "CHRONAPSE_LOG_CONTENT",
        default_value_t = false
    )]
    pub log_content: bool,
}

/// Parsed worker program plus its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl WorkerCommand {
    /// Human-readable form used in status and error text.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        shell_words::join(parts)
    }
}

/// Worker settings that do not come from the menu form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSettings {
    pub command: WorkerCommand,
    pub fps: u32,
    pub camera: u32,
}

/// Initial text for the three menu fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuPrefill {
    pub interval: String,
    pub duration: String,
    pub output: String,
}
