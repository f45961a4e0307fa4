//! UTF-8 safe string helpers for worker output shown in the terminal.
//!
//! Worker lines arrive as raw bytes and may carry ANSI styling. Slicing here
//! respects character boundaries and display width.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Return the leading slice of `s` that fits in `width_cols` display columns.
/// A double-width glyph that would straddle the edge is left out.
pub fn prefix_by_columns(s: &str, width_cols: usize) -> &str {
    if width_cols == 0 || s.is_empty() {
        return "";
    }

    let mut col = 0usize;
    for (idx, ch) in s.char_indices() {
        let glyph_width = UnicodeWidthChar::width(ch).unwrap_or(0).max(1);
        let next_col = col.saturating_add(glyph_width);
        if next_col > width_cols {
            return &s[..idx];
        }
        col = next_col;
    }

    s
}

/// Truncate to `max_cols` display columns, ending with `...` when shortened.
pub fn truncate_columns(s: &str, max_cols: usize) -> String {
    const ELLIPSIS: &str = "...";
    if UnicodeWidthStr::width(s) <= max_cols {
        return s.to_string();
    }
    if max_cols <= ELLIPSIS.len() {
        return ELLIPSIS[..max_cols].to_string();
    }
    let mut out = prefix_by_columns(s, max_cols - ELLIPSIS.len()).to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Decode one raw worker line: strip ANSI escapes, decode lossily, turn tabs into
/// spaces and drop remaining control characters (including a trailing `\r`).
pub fn sanitize_line(raw: &[u8]) -> String {
    // The ANSI stripper swallows tabs, so they become spaces first.
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&byte| if byte == b'\t' { b' ' } else { byte })
        .collect();
    let stripped = strip_ansi_escapes::strip(spaced);
    String::from_utf8_lossy(&stripped)
        .chars()
        .filter_map(|c| match c {
            '\u{200B}' | '\u{FEFF}' => None,
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_by_columns() {
        assert_eq!(prefix_by_columns("abcdef", 3), "abc");
        assert_eq!(prefix_by_columns("abc", 10), "abc");
        assert_eq!(prefix_by_columns("你好世界", 4), "你好");
        assert_eq!(prefix_by_columns("你好世界", 3), "你");
        assert_eq!(prefix_by_columns("abc", 0), "");
    }

    #[test]
    fn test_truncate_columns() {
        assert_eq!(truncate_columns("short", 80), "short");
        let long = "x".repeat(100);
        let truncated = truncate_columns(&long, 80);
        assert_eq!(truncated.len(), 80);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncate_columns("你好世界", 6), "你...");
        assert_eq!(truncate_columns("abcdef", 2), "..");
    }

    #[test]
    fn test_sanitize_line_strips_ansi_and_controls() {
        assert_eq!(
            sanitize_line(b"\x1b[32m[INFO]\x1b[0m ready\r"),
            "[INFO] ready"
        );
        assert_eq!(sanitize_line(b"a\tb\x07c"), "a bc");
    }

    #[test]
    fn test_sanitize_line_keeps_tabs_next_to_escapes() {
        assert_eq!(
            sanitize_line(b"\x1b[1mframe\x1b[0m\t12\tof\t20\n"),
            "frame 12 of 20"
        );
    }

    #[test]
    fn test_sanitize_line_replaces_invalid_utf8() {
        let cleaned = sanitize_line(b"frame \xff done");
        assert!(cleaned.starts_with("frame "));
        assert!(cleaned.ends_with(" done"));
    }
}
