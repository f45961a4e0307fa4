use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::state::PhaseKind;

/// What a key press means in the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    NextField,
    PrevField,
    Submit,
    /// Ask a running worker to stop.
    Cancel,
    Quit,
    Insert(char),
    Backspace,
}

/// Resolve a key press against the phase it arrived in. Unbound keys and
/// key releases map to nothing.
pub fn action_for(phase: PhaseKind, key: KeyEvent) -> Option<UserAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let ctrl_c = ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'));

    match phase {
        PhaseKind::Menu => {
            if ctrl_c {
                return Some(UserAction::Quit);
            }
            match key.code {
                KeyCode::Tab | KeyCode::Down => Some(UserAction::NextField),
                KeyCode::BackTab | KeyCode::Up => Some(UserAction::PrevField),
                KeyCode::Enter => Some(UserAction::Submit),
                KeyCode::Esc => Some(UserAction::Quit),
                KeyCode::Backspace => Some(UserAction::Backspace),
                KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                    Some(UserAction::Insert(ch))
                }
                _ => None,
            }
        }
        PhaseKind::Recording => {
            if ctrl_c || key.code == KeyCode::Char('q') {
                Some(UserAction::Cancel)
            } else {
                None
            }
        }
        PhaseKind::Completed | PhaseKind::Error => {
            if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter) {
                Some(UserAction::Quit)
            } else {
                None
            }
        }
    }
}
