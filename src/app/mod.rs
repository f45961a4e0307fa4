//! Session state machine and the values that drive it.

mod form;
mod keymap;
mod log_ring;
mod logging;
mod message;
mod state;

pub use form::{Field, MenuForm, SessionConfig, ValidationError, SUBMIT_INDEX};
pub use keymap::{action_for, UserAction};
pub use log_ring::LogRing;
#[cfg(test)]
pub(crate) use logging::set_logging_for_tests;
pub use logging::{
    crash_log_path, init_logging, log_debug, log_debug_content, log_file_path, log_panic,
};
pub use message::{ErrorCause, Message, TerminalOutcome};
pub use state::{Completed, Failure, Phase, PhaseKind, Recording, Session};
