use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::{
    io::{self, Write},
    panic,
    sync::{
        atomic::{AtomicBool, Ordering},
        Once,
    },
};

/// Terminal modes we changed and therefore owe a restore for.
struct TerminalModes {
    raw: AtomicBool,
    alternate_screen: AtomicBool,
}

static MODES: TerminalModes = TerminalModes {
    raw: AtomicBool::new(false),
    alternate_screen: AtomicBool::new(false),
};
static PANIC_HOOK: Once = Once::new();

/// Puts the terminal back on drop, and from the panic hook if we never get that far.
pub struct TerminalRestoreGuard {
    _private: (),
}

impl TerminalRestoreGuard {
    pub fn new() -> Self {
        install_terminal_panic_hook();
        Self { _private: () }
    }

    pub fn enable_raw_mode(&self) -> io::Result<()> {
        enable_raw_mode()?;
        MODES.raw.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Switch to the alternate screen and hide the cursor.
    pub fn enter_alt_screen(&self, out: &mut impl Write) -> io::Result<()> {
        execute!(out, EnterAlternateScreen, Hide)?;
        MODES.alternate_screen.store(true, Ordering::SeqCst);
        Ok(())
    }

    pub fn restore(&self) {
        restore_terminal();
    }
}

impl Default for TerminalRestoreGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalRestoreGuard {
    fn drop(&mut self) {
        restore_terminal();
    }
}

/// Idempotent; only undoes modes that were actually entered.
pub fn restore_terminal() {
    if MODES.raw.swap(false, Ordering::SeqCst) {
        let _ = disable_raw_mode();
    }
    let mut stdout = io::stdout();
    if MODES.alternate_screen.swap(false, Ordering::SeqCst) {
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
    let _ = execute!(stdout, Show);
    let _ = stdout.flush();
}

/// Restore the terminal and record the crash before the default hook prints.
pub fn install_terminal_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal();
            crate::log_panic(info);
            crate::log_debug_content(&format!("panic: {info}"));
            previous(info);
        }));
    });
}
