use crate::log_debug;
#[cfg(unix)]
use std::io;

/// Ask the worker's whole process group to wind down with SIGINT, the same
/// signal an interactive Ctrl+C would deliver. Returns false if delivery failed.
pub(super) fn interrupt_group(pid: u32) -> bool {
    #[cfg(unix)]
    {
        let Ok(pgid) = i32::try_from(pid) else {
            log_debug(&format!("worker: pid {pid} out of range for kill(2)"));
            return false;
        };
        // SAFETY: kill(2) takes plain integers; a negative pid targets the group
        // created for the worker at spawn time.
        let rc = unsafe { libc::kill(-pgid, libc::SIGINT) };
        if rc != 0 {
            log_debug(&format!(
                "worker: failed to send SIGINT to group {pgid}: {}",
                io::Error::last_os_error()
            ));
            return false;
        }
        true
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        log_debug("worker: stop requested, but signals are unsupported on this platform");
        false
    }
}
