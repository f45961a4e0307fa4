//! Line protocol spoken by the capture worker on its output streams.
//!
//! ```text
//! [INFO] <free text>
//! [PROGRESS] <current>/<total> (<percent>%)
//! [ERROR] <free text>
//! [SUCCESS] <free text>
//! ```
//!
//! Parsing never fails: anything that is not a well-formed progress report
//! degrades to a log line so the UI always has something to show.

const PROGRESS_MARKER: &str = "[PROGRESS]";

/// Frame counter reported by the worker after each capture.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressEvent {
    pub current: u64,
    pub total: u64,
    pub percent: f64,
}

impl ProgressEvent {
    /// Fraction in `0.0..=1.0` for gauges.
    pub fn ratio(&self) -> f64 {
        (self.percent / 100.0).clamp(0.0, 1.0)
    }
}

/// Leading tag of a worker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTag {
    Info,
    Error,
    Success,
    Progress,
    Plain,
}

impl LogTag {
    fn classify(line: &str) -> Self {
        let trimmed = line.trim_start();
        if trimmed.starts_with("[INFO]") {
            Self::Info
        } else if trimmed.starts_with("[ERROR]") {
            Self::Error
        } else if trimmed.starts_with("[SUCCESS]") {
            Self::Success
        } else if trimmed.starts_with(PROGRESS_MARKER) {
            Self::Progress
        } else {
            Self::Plain
        }
    }

    fn marker(self) -> Option<&'static str> {
        match self {
            Self::Info => Some("[INFO]"),
            Self::Error => Some("[ERROR]"),
            Self::Success => Some("[SUCCESS]"),
            Self::Progress => Some(PROGRESS_MARKER),
            Self::Plain => None,
        }
    }
}

/// One worker line that was not consumed as a progress report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub tag: LogTag,
    pub text: String,
}

impl LogEvent {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            tag: LogTag::classify(&text),
            text,
        }
    }

    /// Text after the leading tag, trimmed.
    pub fn body(&self) -> &str {
        let trimmed = self.text.trim_start();
        match self.tag.marker() {
            Some(marker) => trimmed.strip_prefix(marker).unwrap_or(trimmed).trim(),
            None => trimmed.trim_end(),
        }
    }
}

/// Result of decoding a single line.
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolLine {
    Progress(ProgressEvent),
    Log(LogEvent),
}

/// Decode one line into zero or one event. Blank lines produce nothing.
pub fn parse_line(line: &str) -> Option<ProtocolLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }
    if let Some(progress) = parse_progress(line) {
        return Some(ProtocolLine::Progress(progress));
    }
    Some(ProtocolLine::Log(LogEvent::new(line)))
}

/// Extract `current/total (percent%)` after the progress marker. Numeric fields
/// that do not parse become zero; a missing or malformed counter token rejects
/// the line.
fn parse_progress(line: &str) -> Option<ProgressEvent> {
    let start = line.find(PROGRESS_MARKER)?;
    let rest = &line[start + PROGRESS_MARKER.len()..];
    let mut tokens = rest.split_whitespace();

    let counts = tokens.next()?;
    let (current, total) = counts.split_once('/')?;
    if total.contains('/') {
        return None;
    }
    let current = current.parse::<u64>().unwrap_or(0);
    let total = total.parse::<u64>().unwrap_or(0);

    let percent = tokens
        .next()
        .map(|token| token.trim_matches(|c| matches!(c, '(' | ')' | '%')))
        .and_then(|token| token.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .map(|value| value.clamp(0.0, 100.0))
        .unwrap_or(0.0);

    Some(ProgressEvent {
        current,
        total,
        percent,
    })
}
