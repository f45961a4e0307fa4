use std::io::{self, BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Sender};

use super::outcome::{classify_exit, ExitReport, StreamMarkers};
use super::{SpawnError, WorkerHandle};
use crate::app::{Message, SessionConfig};
use crate::config::{WorkerSettings, DEFAULT_CAMERA_INDEX, DEFAULT_FPS};
use crate::protocol::{parse_line, ProtocolLine};
use crate::utf8_safe::sanitize_line;
use crate::{log_debug, log_debug_content};

/// Flags appended to the configured worker command for one recording.
pub fn worker_args(settings: &WorkerSettings, config: &SessionConfig) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        format_seconds(config.interval_secs),
        "-d".to_string(),
        format_seconds(config.duration_secs),
        "-o".to_string(),
        config.output_path.clone(),
    ];
    if settings.fps != DEFAULT_FPS {
        args.push("-f".to_string());
        args.push(settings.fps.to_string());
    }
    if settings.camera != DEFAULT_CAMERA_INDEX {
        args.push("-c".to_string());
        args.push(settings.camera.to_string());
    }
    args
}

/// Two decimals, unless that would round a positive value down to zero.
pub(super) fn format_seconds(secs: f64) -> String {
    let fixed = format!("{secs:.2}");
    if secs > 0.0 && fixed.parse::<f64>().map_or(true, |value| value == 0.0) {
        secs.to_string()
    } else {
        fixed
    }
}

fn build_command(settings: &WorkerSettings, config: &SessionConfig) -> Command {
    let mut command = Command::new(&settings.command.program);
    command
        .args(&settings.command.args)
        .args(worker_args(settings, config))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        // Own group, so a stop reaches helpers the worker forks as well.
        command.process_group(0);
    }
    command
}

/// How long the waiter keeps waiting for readers after the child exited.
/// A grandchild that inherited the pipes can hold them open indefinitely.
const READER_DRAIN_GRACE: Duration = Duration::from_millis(500);
const READER_POLL: Duration = Duration::from_millis(10);

/// One stream reader thread plus the markers it has seen so far.
struct StreamReader {
    name: &'static str,
    handle: JoinHandle<()>,
    markers: Arc<Mutex<StreamMarkers>>,
}

impl StreamReader {
    fn markers(&self) -> StreamMarkers {
        self.markers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

type Readers = [StreamReader; 2];

pub(super) fn spawn_worker(
    settings: &WorkerSettings,
    config: &SessionConfig,
    events: Sender<Message>,
) -> Result<WorkerHandle, SpawnError> {
    let program = settings.command.program.clone();
    let mut child = build_command(settings, config)
        .spawn()
        .map_err(|source| SpawnError::Spawn {
            program: program.clone(),
            source,
        })?;
    let pid = child.id();
    tracing::info!(pid, program = %program, "worker spawned");
    log_debug(&format!("worker: spawned pid {pid}"));
    log_debug_content(&format!(
        "worker: argv {} {}",
        settings.command.display(),
        worker_args(settings, config).join(" ")
    ));

    let Some(stdout) = child.stdout.take() else {
        abort_child(child);
        return Err(SpawnError::Pipe("stdout"));
    };
    let Some(stderr) = child.stderr.take() else {
        abort_child(child);
        return Err(SpawnError::Pipe("stderr"));
    };

    // The waiter starts first and receives the child only once both readers
    // exist, so every failure path below still owns the child and can reap it.
    let (handoff_tx, handoff_rx) = bounded::<(Child, Readers)>(1);
    let reaped = Arc::new(AtomicBool::new(false));
    let waiter = {
        let events = events.clone();
        let reaped = Arc::clone(&reaped);
        let output_path = config.output_path.clone();
        thread::Builder::new()
            .name("chronapse-wait".into())
            .spawn(move || {
                let Ok((child, readers)) = handoff_rx.recv() else {
                    return;
                };
                wait_and_report(child, readers, &output_path, &reaped, &events);
            })
    };
    let waiter = match waiter {
        Ok(handle) => handle,
        Err(err) => {
            abort_child(child);
            return Err(SpawnError::Thread(err));
        }
    };

    let stdout_reader = match spawn_reader("stdout", stdout, events.clone()) {
        Ok(handle) => handle,
        Err(err) => {
            abort_child(child);
            return Err(SpawnError::Thread(err));
        }
    };
    let stderr_reader = match spawn_reader("stderr", stderr, events) {
        Ok(handle) => handle,
        Err(err) => {
            abort_child(child);
            let _ = stdout_reader.handle.join();
            return Err(SpawnError::Thread(err));
        }
    };

    if let Err(err) = handoff_tx.send((child, [stdout_reader, stderr_reader])) {
        // Waiter already gone; reap here instead.
        let (child, readers) = err.into_inner();
        abort_child(child);
        for reader in readers {
            let _ = reader.handle.join();
        }
        return Err(SpawnError::Thread(io::Error::new(
            io::ErrorKind::Other,
            "waiter thread exited early",
        )));
    }

    Ok(WorkerHandle::new(pid, waiter, reaped))
}

fn spawn_reader<R>(
    name: &'static str,
    stream: R,
    events: Sender<Message>,
) -> io::Result<StreamReader>
where
    R: Read + Send + 'static,
{
    let markers = Arc::new(Mutex::new(StreamMarkers::default()));
    let shared = Arc::clone(&markers);
    let handle = thread::Builder::new()
        .name(format!("chronapse-{name}"))
        .spawn(move || read_stream(name, stream, &events, &shared))?;
    Ok(StreamReader {
        name,
        handle,
        markers,
    })
}

/// Forward every line of one stream until EOF, recording markers as they
/// pass. Keeps draining after the receiver is gone so the worker never
/// blocks on a full pipe.
pub(super) fn read_stream<R: Read>(
    name: &str,
    stream: R,
    events: &Sender<Message>,
    markers: &Mutex<StreamMarkers>,
) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::with_capacity(256);
    let mut forwarding = true;
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                let line = sanitize_line(&buf);
                let Some(parsed) = parse_line(&line) else {
                    continue;
                };
                markers
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .observe(&parsed);
                if !forwarding {
                    continue;
                }
                let message = match parsed {
                    ProtocolLine::Progress(event) => Message::Progress(event),
                    ProtocolLine::Log(event) => Message::Log(event),
                };
                if events.send(message).is_err() {
                    log_debug(&format!("worker: {name} receiver closed; draining"));
                    forwarding = false;
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                log_debug(&format!("worker: {name} read failed: {err}"));
                break;
            }
        }
    }
}

fn wait_and_report(
    mut child: Child,
    readers: Readers,
    output_path: &str,
    reaped: &AtomicBool,
    events: &Sender<Message>,
) {
    let report = match child.wait() {
        Ok(status) => ExitReport::from_status(status),
        Err(err) => ExitReport::WaitFailed(err.to_string()),
    };
    reaped.store(true, Ordering::SeqCst);

    let deadline = Instant::now() + READER_DRAIN_GRACE;
    while Instant::now() < deadline && !readers.iter().all(|r| r.handle.is_finished()) {
        thread::sleep(READER_POLL);
    }

    let mut markers = StreamMarkers::default();
    for reader in readers {
        let seen = reader.markers();
        if reader.handle.is_finished() {
            if reader.handle.join().is_err() {
                log_debug(&format!("worker: {} reader panicked", reader.name));
            }
        } else {
            // Pipe still held open by a descendant; the reader exits on its own at EOF.
            log_debug(&format!(
                "worker: {} still open after exit; detaching reader",
                reader.name
            ));
        }
        markers.merge(seen);
    }

    let outcome = classify_exit(&report, &markers, output_path);
    tracing::info!(?report, "worker reaped");
    log_debug(&format!("worker: reaped ({report:?})"));
    if events.send(Message::Outcome(outcome)).is_err() {
        log_debug("worker: outcome dropped; receiver closed");
    }
}

/// Tear down a child that never made it to the waiter.
fn abort_child(mut child: Child) {
    if let Err(err) = child.kill() {
        log_debug(&format!("worker: kill during setup failed: {err}"));
    }
    if let Err(err) = child.wait() {
        log_debug(&format!("worker: reap during setup failed: {err}"));
    }
}
