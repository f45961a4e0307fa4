use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn chronapse_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_chronapse").expect("chronapse test binary not built")
}

#[test]
fn help_mentions_name_and_worker_flag() {
    let output = Command::new(chronapse_bin())
        .arg("--help")
        .output()
        .expect("run chronapse --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("Chronapse"));
    assert!(combined.contains("--worker-cmd"));
}

#[test]
fn out_of_range_tick_is_rejected_before_the_terminal_opens() {
    let output = Command::new(chronapse_bin())
        .args(["--tick-ms", "5"])
        .env_remove("CHRONAPSE_WORKER_CMD")
        .output()
        .expect("run chronapse --tick-ms 5");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--tick-ms"));
}

#[test]
fn unknown_theme_is_a_usage_error() {
    let output = Command::new(chronapse_bin())
        .args(["--theme", "neon"])
        .output()
        .expect("run chronapse --theme neon");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unbalanced_worker_command_is_rejected() {
    let output = Command::new(chronapse_bin())
        .args(["--worker-cmd", "python3 \"timelapse.py"])
        .output()
        .expect("run chronapse with bad worker cmd");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("unbalanced"));
}
