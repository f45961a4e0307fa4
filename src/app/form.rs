use std::fmt;

use crate::config::{
    MenuPrefill, DEFAULT_DURATION_SECS, DEFAULT_INTERVAL_SECS, DEFAULT_OUTPUT_PATH,
};

/// Editable fields on the menu screen, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Interval,
    Duration,
    Output,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Interval, Field::Duration, Field::Output];

    pub fn label(self) -> &'static str {
        match self {
            Field::Interval => "Interval (seconds):",
            Field::Duration => "Duration (seconds):",
            Field::Output => "Output file:",
        }
    }

    /// Value shown dimmed while the field is blank; also the submit default.
    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Interval => DEFAULT_INTERVAL_SECS,
            Field::Duration => DEFAULT_DURATION_SECS,
            Field::Output => DEFAULT_OUTPUT_PATH,
        }
    }

    pub fn char_limit(self) -> usize {
        match self {
            Field::Interval | Field::Duration => 10,
            Field::Output => 256,
        }
    }

    fn index(self) -> usize {
        match self {
            Field::Interval => 0,
            Field::Duration => 1,
            Field::Output => 2,
        }
    }
}

/// Focus slot of the "Start Recording" button, one past the last field.
pub const SUBMIT_INDEX: usize = Field::ALL.len();

/// Validated parameters for one recording. Never built from unchecked text.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub interval_secs: f64,
    pub duration_secs: f64,
    pub output_path: String,
}

impl SessionConfig {
    pub fn new(
        interval_secs: f64,
        duration_secs: f64,
        output_path: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let interval_secs = check_seconds(interval_secs)
            .ok_or_else(|| ValidationError::Interval(interval_secs.to_string()))?;
        let duration_secs = check_seconds(duration_secs)
            .ok_or_else(|| ValidationError::Duration(duration_secs.to_string()))?;
        let output_path = output_path.into();
        if output_path.trim().is_empty() || output_path.chars().any(char::is_control) {
            return Err(ValidationError::Output);
        }
        Ok(Self {
            interval_secs,
            duration_secs,
            output_path,
        })
    }

    /// Frames the worker will aim for (`duration / interval`, rounded down; 0
    /// when the interval is longer than the duration).
    pub fn expected_frames(&self) -> u64 {
        (self.duration_secs / self.interval_secs).floor() as u64
    }
}

fn check_seconds(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Why the menu refused to start a recording.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Interval(String),
    Duration(String),
    Output,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Interval(raw) => write!(
                f,
                "Invalid interval value '{raw}' (use a positive number of seconds)"
            ),
            ValidationError::Duration(raw) => write!(
                f,
                "Invalid duration value '{raw}' (use a positive number of seconds)"
            ),
            ValidationError::Output => write!(f, "Invalid output file name"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Draft values and focus for the menu screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuForm {
    values: [String; 3],
    focus: usize,
}

impl MenuForm {
    pub fn new(prefill: &MenuPrefill) -> Self {
        Self {
            values: [
                prefill.interval.clone(),
                prefill.duration.clone(),
                prefill.output.clone(),
            ],
            focus: 0,
        }
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn focused_field(&self) -> Option<Field> {
        Field::ALL.get(self.focus).copied()
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    /// Move focus forward, wrapping from the submit button back to the first field.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % (SUBMIT_INDEX + 1);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.checked_sub(1).unwrap_or(SUBMIT_INDEX);
    }

    /// Append to the focused field. Returns false when nothing changed.
    pub fn push_char(&mut self, ch: char) -> bool {
        let Some(field) = self.focused_field() else {
            return false;
        };
        if ch.is_control() {
            return false;
        }
        let value = &mut self.values[field.index()];
        if value.chars().count() >= field.char_limit() {
            return false;
        }
        value.push(ch);
        true
    }

    pub fn backspace(&mut self) -> bool {
        match self.focused_field() {
            Some(field) => self.values[field.index()].pop().is_some(),
            None => false,
        }
    }

    /// Resolve blanks to their defaults and validate the result.
    pub fn submit(&self) -> Result<SessionConfig, ValidationError> {
        let interval_raw = self.resolved(Field::Interval);
        let duration_raw = self.resolved(Field::Duration);
        let output = self.resolved(Field::Output);

        let interval = interval_raw
            .parse::<f64>()
            .map_err(|_| ValidationError::Interval(interval_raw.to_string()))?;
        let interval = check_seconds(interval)
            .ok_or_else(|| ValidationError::Interval(interval_raw.to_string()))?;
        let duration = duration_raw
            .parse::<f64>()
            .map_err(|_| ValidationError::Duration(duration_raw.to_string()))?;
        let duration = check_seconds(duration)
            .ok_or_else(|| ValidationError::Duration(duration_raw.to_string()))?;

        SessionConfig::new(interval, duration, output)
    }

    fn resolved(&self, field: Field) -> &str {
        let trimmed = self.value(field).trim();
        if trimmed.is_empty() {
            field.placeholder()
        } else {
            trimmed
        }
    }
}
