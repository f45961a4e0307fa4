use clap::ValueEnum;
use ratatui::style::{Color, Modifier, Style};

/// Named color scheme selectable with `--theme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Theme {
    Violet,
    Coral,
    /// No colors; relies on bold/dim only.
    Plain,
}

/// Resolved styles for every visual role on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub title: Style,
    pub focused: Style,
    pub blurred: Style,
    pub placeholder: Style,
    pub help: Style,
    pub log: Style,
    pub success: Style,
    pub error: Style,
    pub gauge_filled: Style,
    pub gauge_empty: Style,
}

impl Theme {
    pub fn palette(self) -> Palette {
        match self {
            Theme::Violet => colored(
                Color::Rgb(125, 86, 244),
                Color::Rgb(4, 181, 117),
                Color::Rgb(255, 0, 0),
            ),
            Theme::Coral => colored(
                Color::Rgb(255, 90, 90),
                Color::Rgb(120, 200, 140),
                Color::Rgb(255, 60, 60),
            ),
            Theme::Plain => Palette {
                accent: Color::Reset,
                title: Style::new().add_modifier(Modifier::BOLD),
                focused: Style::new().add_modifier(Modifier::BOLD),
                blurred: Style::new(),
                placeholder: Style::new().add_modifier(Modifier::DIM),
                help: Style::new().add_modifier(Modifier::DIM),
                log: Style::new().add_modifier(Modifier::DIM),
                success: Style::new().add_modifier(Modifier::BOLD),
                error: Style::new().add_modifier(Modifier::BOLD),
                gauge_filled: Style::new(),
                gauge_empty: Style::new().add_modifier(Modifier::DIM),
            },
        }
    }
}

fn colored(accent: Color, success: Color, error: Color) -> Palette {
    let muted = Color::Rgb(98, 98, 98);
    Palette {
        accent,
        title: Style::new().fg(accent).add_modifier(Modifier::BOLD),
        focused: Style::new().fg(accent),
        blurred: Style::new().fg(Color::Rgb(125, 125, 125)),
        placeholder: Style::new().fg(Color::Rgb(90, 90, 90)),
        help: Style::new().fg(muted),
        log: Style::new().fg(muted),
        success: Style::new().fg(success).add_modifier(Modifier::BOLD),
        error: Style::new().fg(error).add_modifier(Modifier::BOLD),
        gauge_filled: Style::new().fg(accent),
        gauge_empty: Style::new().fg(muted),
    }
}
