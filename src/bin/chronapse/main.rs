//! Chronapse entrypoint: parse flags, wire up logging, hand the terminal to the UI.

use anyhow::{Context, Result};
use chronapse::config::AppConfig;
use chronapse::{init_logging, init_tracing, log_debug, log_file_path, ui};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    let tracing_enabled = init_tracing(&config);
    log_debug(&format!(
        "chronapse v{} starting (worker: {}, trace: {tracing_enabled})",
        env!("CARGO_PKG_VERSION"),
        config.worker_cmd
    ));

    let result = ui::run_app(&config).context("terminal session failed");
    if let Err(err) = &result {
        log_debug(&format!("exiting with error: {err:#}"));
        if config.logs && !config.no_logs {
            eprintln!("Debug log: {}", log_file_path().display());
        }
    }
    result
}
