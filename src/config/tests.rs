use super::validation::split_worker_command;
use super::{AppConfig, DEFAULT_LOG_CAPACITY, DEFAULT_TICK_MS, DEFAULT_WORKER_CMD};
use crate::ui::Theme;
use clap::Parser;
use std::time::Duration;

fn parse(args: &[&str]) -> AppConfig {
    let mut argv = vec!["test-app"];
    argv.extend_from_slice(args);
    AppConfig::parse_from(argv)
}

#[test]
fn defaults_validate() {
    let mut cfg = parse(&[]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.worker_cmd, DEFAULT_WORKER_CMD);
    assert_eq!(cfg.tick_ms, DEFAULT_TICK_MS);
    assert_eq!(cfg.log_capacity, DEFAULT_LOG_CAPACITY);
    assert_eq!(cfg.theme, Theme::Violet);
    assert_eq!(cfg.tick_interval(), Duration::from_millis(100));
}

#[test]
fn worker_settings_split_program_and_args() {
    let cfg = parse(&["--worker-cmd", "python3 'my scripts/timelapse.py'"]);
    let settings = cfg.worker_settings().expect("worker settings");
    assert_eq!(settings.command.program, "python3");
    assert_eq!(settings.command.args, vec!["my scripts/timelapse.py"]);
    assert_eq!(settings.fps, 30);
    assert_eq!(settings.camera, 0);
}

#[test]
fn rejects_empty_worker_cmd() {
    let mut cfg = parse(&["--worker-cmd", "   "]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_unbalanced_worker_quotes() {
    assert!(split_worker_command("python3 'timelapse.py").is_err());
}

#[test]
fn rejects_too_many_worker_args() {
    let raw = std::iter::once("worker".to_string())
        .chain((0..65).map(|i| format!("a{i}")))
        .collect::<Vec<_>>()
        .join(" ");
    assert!(split_worker_command(&raw).is_err());
}

#[test]
fn rejects_fps_out_of_bounds() {
    let mut cfg = parse(&["--fps", "0"]);
    assert!(cfg.validate().is_err());

    let mut cfg = parse(&["--fps", "241"]);
    assert!(cfg.validate().is_err());

    let mut cfg = parse(&["--fps", "240"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_tick_out_of_bounds() {
    let mut cfg = parse(&["--tick-ms", "5"]);
    assert!(cfg.validate().is_err());

    let mut cfg = parse(&["--tick-ms", "5000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_log_capacity_out_of_bounds() {
    let mut cfg = parse(&["--log-capacity", "0"]);
    assert!(cfg.validate().is_err());

    let mut cfg = parse(&["--log-capacity", "51"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_non_positive_prefill() {
    let mut cfg = parse(&["--interval", "0"]);
    assert!(cfg.validate().is_err());

    let mut cfg = parse(&["--duration=-3"]);
    assert!(cfg.validate().is_err());

    let mut cfg = parse(&["--output", " "]);
    assert!(cfg.validate().is_err());
}

#[test]
fn menu_prefill_formats_numbers() {
    let cfg = parse(&["--interval", "2.5", "--duration", "30", "--output", "out.mp4"]);
    let prefill = cfg.menu_prefill();
    assert_eq!(prefill.interval, "2.5");
    assert_eq!(prefill.duration, "30");
    assert_eq!(prefill.output, "out.mp4");
}

#[test]
fn menu_prefill_blank_without_flags() {
    let prefill = parse(&[]).menu_prefill();
    assert!(prefill.interval.is_empty());
    assert!(prefill.duration.is_empty());
    assert!(prefill.output.is_empty());
}

#[test]
fn theme_flag_parses_value_enum() {
    let cfg = parse(&["--theme", "plain"]);
    assert_eq!(cfg.theme, Theme::Plain);
}
