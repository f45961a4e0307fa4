//! Chronapse: a terminal front-end that configures and supervises an external
//! timelapse capture worker.

pub mod app;
pub mod config;
pub mod protocol;
mod telemetry;
pub mod terminal_restore;
pub mod ui;
pub mod utf8_safe;
pub mod worker;

pub use app::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use telemetry::init_tracing;
