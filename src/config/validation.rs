use super::defaults::{
    MAX_CAMERA_INDEX, MAX_FPS, MAX_LOG_CAPACITY, MAX_TICK_MS, MAX_WORKER_ARGS,
    MAX_WORKER_ARG_BYTES, MIN_TICK_MS,
};
use super::{AppConfig, MenuPrefill, WorkerCommand, WorkerSettings};
use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::time::Duration;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize the worker command.
    pub fn validate(&mut self) -> Result<()> {
        let command = split_worker_command(&self.worker_cmd)?;
        self.worker_cmd = command.display();

        if self.fps == 0 || self.fps > MAX_FPS {
            bail!("--fps must be between 1 and {MAX_FPS}, got {}", self.fps);
        }
        if self.camera > MAX_CAMERA_INDEX {
            bail!(
                "--camera must be between 0 and {MAX_CAMERA_INDEX}, got {}",
                self.camera
            );
        }
        if !(MIN_TICK_MS..=MAX_TICK_MS).contains(&self.tick_ms) {
            bail!(
                "--tick-ms must be between {MIN_TICK_MS} and {MAX_TICK_MS}, got {}",
                self.tick_ms
            );
        }
        if !(1..=MAX_LOG_CAPACITY).contains(&self.log_capacity) {
            bail!(
                "--log-capacity must be between 1 and {MAX_LOG_CAPACITY}, got {}",
                self.log_capacity
            );
        }

        if let Some(interval) = self.interval {
            if !interval.is_finite() || interval <= 0.0 {
                bail!("--interval must be a positive number of seconds, got {interval}");
            }
        }
        if let Some(duration) = self.duration {
            if !duration.is_finite() || duration <= 0.0 {
                bail!("--duration must be a positive number of seconds, got {duration}");
            }
        }
        if let Some(output) = &self.output {
            if output.trim().is_empty() {
                bail!("--output must not be empty");
            }
            if output.contains('\0') {
                bail!("--output must not contain NUL bytes");
            }
        }

        Ok(())
    }

    /// Resolve the worker program and pass-through flags.
    pub fn worker_settings(&self) -> Result<WorkerSettings> {
        let command = split_worker_command(&self.worker_cmd)?;
        Ok(WorkerSettings {
            command,
            fps: self.fps,
            camera: self.camera,
        })
    }

    /// Initial menu text derived from `--interval`, `--duration`, and `--output`.
    pub fn menu_prefill(&self) -> MenuPrefill {
        MenuPrefill {
            interval: self.interval.map(|v| v.to_string()).unwrap_or_default(),
            duration: self.duration.map(|v| v.to_string()).unwrap_or_default(),
            output: self.output.clone().unwrap_or_default(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Split a worker command line into program and arguments.
pub(crate) fn split_worker_command(raw: &str) -> Result<WorkerCommand> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("--worker-cmd cannot be empty");
    }
    if trimmed.contains('\0') {
        bail!("--worker-cmd must not contain NUL bytes");
    }
    let mut parts = shell_words::split(trimmed)
        .with_context(|| format!("--worker-cmd has unbalanced quoting: {trimmed}"))?;
    if parts.is_empty() {
        return Err(anyhow!("--worker-cmd cannot be empty"));
    }
    let program = parts.remove(0);
    if program.trim().is_empty() {
        bail!("--worker-cmd program name cannot be blank");
    }
    // Keep argv small; the worker receives three more flag pairs on top of these.
    if parts.len() > MAX_WORKER_ARGS {
        bail!(
            "--worker-cmd has too many arguments (max {MAX_WORKER_ARGS}, got {})",
            parts.len()
        );
    }
    let total_arg_bytes: usize = parts.iter().map(|arg| arg.len()).sum();
    if total_arg_bytes > MAX_WORKER_ARG_BYTES {
        bail!("combined --worker-cmd arguments exceed {MAX_WORKER_ARG_BYTES} bytes");
    }
    Ok(WorkerCommand {
        program,
        args: parts,
    })
}
