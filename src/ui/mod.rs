//! Full-screen ratatui front-end: terminal setup, the dispatch loop and drawing.

mod theme;
mod view;

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    style::Style,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame, Terminal,
};

use crate::app::{Message, Session};
use crate::config::AppConfig;
use crate::log_debug;
use crate::terminal_restore::TerminalRestoreGuard;
use crate::worker::ProcessLauncher;

pub use theme::{Palette, Theme};
pub use view::render;

/// Configure the terminal, run the dispatch loop, and tear everything down.
pub fn run_app(config: &AppConfig) -> Result<()> {
    let settings = config.worker_settings()?;
    let (tx, rx) = unbounded();
    let mut session = Session::new(
        &config.menu_prefill(),
        Box::new(ProcessLauncher::new(settings)),
        tx.clone(),
        config.log_capacity,
    );
    let palette = config.theme.palette();

    let terminal_guard = TerminalRestoreGuard::new();
    terminal_guard.enable_raw_mode()?;
    let mut stdout = io::stdout();
    terminal_guard.enter_alt_screen(&mut stdout)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    spawn_input_thread(tx);
    let result = event_loop(
        &mut terminal,
        &mut session,
        &rx,
        config.tick_interval(),
        &palette,
    );

    drop(terminal);
    terminal_guard.restore();
    result
}

/// Forward terminal input to the inbound channel until the receiver goes away.
fn spawn_input_thread(tx: Sender<Message>) -> thread::JoinHandle<()> {
    thread::spawn(move || loop {
        let message = match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => Message::Input(key),
            // Resizes only need a repaint.
            Ok(Event::Resize(_, _)) => Message::Tick,
            Ok(_) => continue,
            Err(err) => {
                log_debug(&format!("terminal input error: {err}"));
                break;
            }
        };
        if tx.send(message).is_err() {
            break;
        }
    })
}

/// Apply one message at a time until the session asks to quit, repainting
/// only when state changed or the clock-driven parts need to move.
pub(crate) fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut Session,
    inbound: &Receiver<Message>,
    tick_every: Duration,
    palette: &Palette,
) -> Result<()> {
    let ticker = tick(tick_every);
    terminal.draw(|frame| draw(frame, session, Instant::now(), palette))?;
    session.take_redraw_request();

    while !session.should_quit() {
        select! {
            recv(inbound) -> message => match message {
                Ok(message) => session.apply(message),
                Err(_) => bail!("inbound channel closed"),
            },
            recv(ticker) -> _ => session.apply(Message::Tick),
        }
        if session.take_redraw_request() {
            terminal.draw(|frame| draw(frame, session, Instant::now(), palette))?;
        }
    }
    Ok(())
}

pub fn draw(frame: &mut Frame<'_>, session: &Session, now: Instant, palette: &Palette) {
    let text = render(session.phase(), now, palette);
    // No wrapping: long worker lines are already truncated by the view.
    let body = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(palette.accent)),
    );
    frame.render_widget(body, frame.size());
}
