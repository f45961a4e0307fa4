use super::*;
use crate::app::{ErrorCause, TerminalOutcome};
use crate::config::WorkerCommand;
use crate::protocol::LogTag;
use crossbeam_channel::{unbounded, Receiver};
use std::sync::Mutex;
use std::time::{Duration, Instant};

fn settings(program: &str, args: &[&str]) -> WorkerSettings {
    WorkerSettings {
        command: WorkerCommand {
            program: program.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        },
        fps: crate::config::DEFAULT_FPS,
        camera: crate::config::DEFAULT_CAMERA_INDEX,
    }
}

fn session(output: &str) -> SessionConfig {
    SessionConfig::new(2.0, 30.0, output).expect("valid session")
}

/// `sh -c <script> worker -i .. -d .. -o <path>` puts the output path in `$6`.
fn shell(script: &str) -> ProcessLauncher {
    ProcessLauncher::new(settings("/bin/sh", &["-c", script, "worker"]))
}

fn collect_until_outcome(rx: &Receiver<Message>) -> (Vec<Message>, TerminalOutcome) {
    let mut seen = Vec::new();
    loop {
        match rx.recv_timeout(Duration::from_secs(10)) {
            Ok(Message::Outcome(outcome)) => return (seen, outcome),
            Ok(other) => seen.push(other),
            Err(err) => panic!("worker did not finish: {err}"),
        }
    }
}

#[test]
fn worker_args_format_seconds_with_two_decimals() {
    let args = worker_args(&settings("python3", &[]), &session("out.mp4"));
    assert_eq!(args, vec!["-i", "2.00", "-d", "30.00", "-o", "out.mp4"]);
}

#[test]
fn tiny_seconds_keep_their_precision() {
    let config = SessionConfig::new(0.005, 0.001, "out.mp4").expect("valid session");
    let args = worker_args(&settings("python3", &[]), &config);
    assert_eq!(&args[..4], ["-i", "0.005", "-d", "0.001"]);
    assert_eq!(supervisor::format_seconds(0.25), "0.25");
    assert_eq!(supervisor::format_seconds(1.0 / 3.0), "0.33");
}

#[test]
fn worker_args_forward_non_default_fps_and_camera() {
    let mut custom = settings("python3", &[]);
    custom.fps = 24;
    custom.camera = 2;
    let args = worker_args(&custom, &session("out.mp4"));
    assert_eq!(&args[6..], ["-f", "24", "-c", "2"]);
}

#[test]
fn missing_program_is_a_spawn_error() {
    let launcher = ProcessLauncher::new(settings("/nonexistent/chronapse-worker", &[]));
    let (tx, _rx) = unbounded();
    match launcher.start(&session("out.mp4"), tx) {
        Err(SpawnError::Spawn { program, .. }) => {
            assert_eq!(program, "/nonexistent/chronapse-worker")
        }
        other => panic!("expected spawn error, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn forwards_lines_in_order_then_reports_success() {
    let launcher = shell(
        r#"echo "[INFO] Camera initialized"
for i in 1 2 3; do echo "[PROGRESS] $i/3 (50.0%)"; done
echo "[SUCCESS] Video saved to: $6""#,
    );
    let (tx, rx) = unbounded();
    let handle = launcher.start(&session("clip.mp4"), tx).expect("spawn");
    assert!(handle.pid().is_some());

    let (seen, outcome) = collect_until_outcome(&rx);
    handle.finish();

    let currents: Vec<u64> = seen
        .iter()
        .filter_map(|msg| match msg {
            Message::Progress(event) => Some(event.current),
            _ => None,
        })
        .collect();
    assert_eq!(currents, vec![1, 2, 3]);
    assert!(seen
        .iter()
        .any(|msg| matches!(msg, Message::Log(event) if event.tag == LogTag::Info)));
    assert_eq!(
        outcome,
        TerminalOutcome::Succeeded {
            message: "Video saved to: clip.mp4".to_string()
        }
    );
}

#[cfg(unix)]
#[test]
fn final_line_without_newline_is_delivered() {
    let launcher = shell("printf '[SUCCESS] done'");
    let (tx, rx) = unbounded();
    let handle = launcher.start(&session("out.mp4"), tx).expect("spawn");
    let (seen, outcome) = collect_until_outcome(&rx);
    handle.finish();
    assert_eq!(seen.len(), 1);
    assert_eq!(
        outcome,
        TerminalOutcome::Succeeded {
            message: "done".to_string()
        }
    );
}

#[cfg(unix)]
#[test]
fn stderr_error_line_explains_failure() {
    let launcher = shell(r#"echo "[ERROR] Could not open camera 0" >&2; exit 3"#);
    let (tx, rx) = unbounded();
    let handle = launcher.start(&session("out.mp4"), tx).expect("spawn");
    let (seen, outcome) = collect_until_outcome(&rx);
    handle.finish();

    assert!(seen
        .iter()
        .any(|msg| matches!(msg, Message::Log(event) if event.tag == LogTag::Error)));
    assert_eq!(
        outcome,
        TerminalOutcome::Failed {
            message: "Recording failed: exit status 3: Could not open camera 0".to_string(),
            cause: ErrorCause::WorkerExit {
                code: Some(3),
                signal: None
            },
        }
    );
}

#[cfg(unix)]
#[test]
fn clean_exit_without_success_line_fails() {
    let launcher = shell(r#"echo "[INFO] nothing to do""#);
    let (tx, rx) = unbounded();
    let handle = launcher.start(&session("out.mp4"), tx).expect("spawn");
    let (_, outcome) = collect_until_outcome(&rx);
    handle.finish();
    assert!(matches!(
        outcome,
        TerminalOutcome::Failed {
            cause: ErrorCause::MissingSuccess,
            ..
        }
    ));
}

#[cfg(unix)]
#[test]
fn stop_request_lets_worker_finish_gracefully() {
    let launcher = shell(
        r#"trap 'echo "[INFO] Recording stopped by user"; echo "[SUCCESS] Video saved to: $6"; exit 0' INT
echo "[INFO] ready"
while true; do sleep 0.05; done"#,
    );
    let (tx, rx) = unbounded();
    let mut handle = launcher.start(&session("stop.mp4"), tx).expect("spawn");

    match rx.recv_timeout(Duration::from_secs(10)) {
        Ok(Message::Log(event)) => assert_eq!(event.body(), "ready"),
        other => panic!("expected ready line, got {other:?}"),
    }
    assert!(handle.request_stop());
    assert_eq!(handle.stop_requests(), 1);

    let (_, outcome) = collect_until_outcome(&rx);
    handle.finish();
    assert_eq!(
        outcome,
        TerminalOutcome::Succeeded {
            message: "Video saved to: stop.mp4".to_string()
        }
    );
}

#[cfg(unix)]
#[test]
fn background_helper_holding_the_pipe_does_not_delay_the_outcome() {
    let launcher = shell(r#"sleep 3 & echo "[SUCCESS] Video saved to: $6"; exit 0"#);
    let (tx, rx) = unbounded();
    let started = Instant::now();
    let mut handle = launcher.start(&session("bg.mp4"), tx).expect("spawn");

    let (_, outcome) = collect_until_outcome(&rx);
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "outcome waited on the helper: {:?}",
        started.elapsed()
    );
    assert_eq!(
        outcome,
        TerminalOutcome::Succeeded {
            message: "Video saved to: bg.mp4".to_string()
        }
    );
    // The helper is still alive in the worker's group, so a stop still has a target.
    assert!(handle.request_stop());
    handle.finish();
}

#[cfg(unix)]
#[test]
fn closed_receiver_does_not_wedge_the_worker() {
    let launcher = shell(r#"i=0; while [ $i -lt 2000 ]; do echo "[INFO] line $i"; i=$((i+1)); done; echo "[SUCCESS] ok""#);
    let (tx, rx) = unbounded();
    let handle = launcher.start(&session("out.mp4"), tx).expect("spawn");
    drop(rx);
    // Joins the waiter; returns only once the child has been reaped.
    handle.finish();
}

#[test]
fn read_stream_collects_markers_from_raw_bytes() {
    let (tx, rx) = unbounded();
    let input: &[u8] = b"\x1b[32m[INFO]\x1b[0m hi\r\n\n[ERROR] boom\n[PROGRESS] 1/2 (50.0%)";
    let markers = Mutex::new(StreamMarkers::default());
    supervisor::read_stream("test", input, &tx, &markers);
    let markers = markers.into_inner().expect("markers lock");
    assert_eq!(markers.error.as_deref(), Some("boom"));
    assert_eq!(markers.success, None);
    let received: Vec<Message> = rx.try_iter().collect();
    assert_eq!(received.len(), 3);
    assert!(matches!(&received[0], Message::Log(event) if event.text == "[INFO] hi"));
    assert!(matches!(&received[2], Message::Progress(event) if event.current == 1));
}
