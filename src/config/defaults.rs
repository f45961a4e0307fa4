/// Worker invocation used when `--worker-cmd` is not given.
pub const DEFAULT_WORKER_CMD: &str = "python3 timelapse.py";

/// Values substituted for blank menu fields at submit time.
pub const DEFAULT_INTERVAL_SECS: &str = "5";
pub const DEFAULT_DURATION_SECS: &str = "60";
pub const DEFAULT_OUTPUT_PATH: &str = "timelapse.mp4";

pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_CAMERA_INDEX: u32 = 0;
pub const DEFAULT_TICK_MS: u64 = 100;
pub const DEFAULT_LOG_CAPACITY: usize = 5;

pub(super) const MIN_TICK_MS: u64 = 20;
pub(super) const MAX_TICK_MS: u64 = 1000;
pub(super) const MAX_LOG_CAPACITY: usize = 50;
pub(super) const MAX_FPS: u32 = 240;
pub(super) const MAX_CAMERA_INDEX: u32 = 63;
pub(super) const MAX_WORKER_ARGS: usize = 64;
pub(super) const MAX_WORKER_ARG_BYTES: usize = 8 * 1024;
