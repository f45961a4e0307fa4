//! Pure rendering: phase + clock + palette in, styled text out.

use std::time::{Duration, Instant};

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

use super::theme::Palette;
use crate::app::{Completed, Failure, Field, MenuForm, Phase, Recording, SUBMIT_INDEX};
use crate::protocol::{LogTag, ProgressEvent};
use crate::utf8_safe::truncate_columns;

pub(super) const TITLE: &str = "⏱  Chronapse Timelapse Recorder";
const MENU_HELP: &str = "Tab: next • Enter: start • Ctrl+C: quit";
const RECORDING_HELP: &str = "Press 'q' to stop recording";
const EXIT_HELP: &str = "Press 'q' to exit";
const FOCUS_MARKER: &str = "▸ ";
const BAR_WIDTH: usize = 40;
const LOG_COLUMNS: usize = 80;
pub(super) const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SPINNER_STEP: Duration = Duration::from_millis(100);

/// Build the whole screen for `phase` as of `now`. No side effects.
pub fn render(phase: &Phase, now: Instant, palette: &Palette) -> Text<'static> {
    let lines = match phase {
        Phase::Menu(form) => menu_lines(form, palette),
        Phase::Recording(recording) => recording_lines(recording, now, palette),
        Phase::Completed(done) => completed_lines(done, palette),
        Phase::Error(failure) => error_lines(failure, palette),
    };
    Text::from(lines)
}

fn menu_lines(form: &MenuForm, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![Line::styled(TITLE, palette.title), Line::default()];

    for field in Field::ALL {
        let focused = form.focused_field() == Some(field);
        let (marker, label_style) = if focused {
            (FOCUS_MARKER, palette.focused)
        } else {
            ("  ", palette.blurred)
        };
        let value = form.value(field);
        let mut spans = vec![
            Span::styled(marker, palette.focused),
            Span::styled(format!("{:<20}", field.label()), label_style),
        ];
        if value.is_empty() {
            spans.push(Span::styled(field.placeholder(), palette.placeholder));
        } else {
            spans.push(Span::styled(value.to_string(), label_style));
        }
        if focused {
            spans.push(Span::styled("▏", palette.focused));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    // Marker as well as color, so focus still shows under the plain theme.
    let (marker, button_style) = if form.focus() == SUBMIT_INDEX {
        (FOCUS_MARKER, palette.title)
    } else {
        ("  ", palette.blurred)
    };
    lines.push(Line::from(vec![
        Span::styled(marker, palette.focused),
        Span::styled("[ Start Recording ]", button_style),
    ]));
    lines.push(Line::default());
    lines.push(Line::styled(MENU_HELP, palette.help));
    lines
}

fn recording_lines(recording: &Recording, now: Instant, palette: &Palette) -> Vec<Line<'static>> {
    let elapsed = now.saturating_duration_since(recording.started_at);
    let mut header = vec![
        Span::styled(spinner_frame(elapsed), palette.focused),
        Span::styled(" Recording timelapse", palette.title),
    ];
    if recording.stop_requested {
        header.push(Span::styled("  Stopping...", palette.help));
    }

    let config = &recording.config;
    let event = recording.last_progress.unwrap_or_default();
    let total = if event.total > 0 {
        event.total
    } else {
        config.expected_frames()
    };
    let ratio = progress_ratio(&event);

    let mut lines = vec![
        Line::styled(TITLE, palette.title),
        Line::default(),
        Line::from(header),
        Line::default(),
        Line::from(format!("Output: {}", config.output_path)),
        Line::from(format!(
            "Interval: {:.2}s  Duration: {:.2}s",
            config.interval_secs, config.duration_secs
        )),
        Line::default(),
        progress_bar(ratio, palette),
        Line::from(format!("Frames: {} / {}", event.current, total)),
        Line::from(format!("Elapsed: {}", format_elapsed(elapsed))),
    ];

    if !recording.recent_logs.is_empty() {
        lines.push(Line::default());
        lines.push(Line::styled("Recent activity:", palette.blurred));
        for log in recording.recent_logs.iter() {
            let style = match log.tag {
                LogTag::Error => palette.error,
                LogTag::Success => palette.success,
                _ => palette.log,
            };
            lines.push(Line::styled(
                format!("  {}", truncate_columns(&log.text, LOG_COLUMNS)),
                style,
            ));
        }
    }

    lines.push(Line::default());
    lines.push(Line::styled(RECORDING_HELP, palette.help));
    lines
}

fn completed_lines(done: &Completed, palette: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::styled("✓ Recording Complete", palette.success),
        Line::default(),
        Line::from(done.message.clone()),
        Line::from(format!("Frames captured: {}", done.frames_captured)),
        Line::from(format!("Elapsed: {}", format_elapsed(done.elapsed))),
        Line::default(),
        Line::styled(EXIT_HELP, palette.help),
    ]
}

fn error_lines(failure: &Failure, palette: &Palette) -> Vec<Line<'static>> {
    vec![
        Line::styled("✗ Error", palette.error),
        Line::default(),
        Line::from(failure.message.clone()),
        Line::default(),
        Line::styled(EXIT_HELP, palette.help),
    ]
}

/// Falls back to `current/total` when the worker's percent field was unusable.
fn progress_ratio(event: &ProgressEvent) -> f64 {
    if event.percent > 0.0 {
        event.ratio()
    } else if event.total > 0 {
        (event.current as f64 / event.total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn progress_bar(ratio: f64, palette: &Palette) -> Line<'static> {
    let filled = ((ratio * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    Line::from(vec![
        Span::styled("█".repeat(filled), palette.gauge_filled),
        Span::styled("░".repeat(BAR_WIDTH - filled), palette.gauge_empty),
        Span::styled(format!(" {:>5.1}%", ratio * 100.0), Style::default()),
    ])
}

pub(super) fn spinner_frame(elapsed: Duration) -> &'static str {
    let step = (elapsed.as_millis() / SPINNER_STEP.as_millis()) as usize;
    SPINNER_FRAMES[step % SPINNER_FRAMES.len()]
}

/// Whole seconds, e.g. `7s`, `2m05s`, `1h00m30s`.
pub(super) fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64().round() as u64;
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{hours}h{minutes:02}m{seconds:02}s")
    } else if minutes > 0 {
        format!("{minutes}m{seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
