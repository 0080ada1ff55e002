//! Key bindings: maps key events to player actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::controller::{find_preset, Preset};

/// Player actions triggered by key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Freeze or resume the transport clock.
    TogglePause,
    /// Apply the preset bound to this key.
    ApplyPreset(char),
}

/// Map a key event to an action.
///
/// Quit keys win over presets, so a preset bound to `q` is unreachable.
pub fn map_key(key: KeyEvent, presets: &[Preset]) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(' ') => Some(Action::TogglePause),
        KeyCode::Char(c) if !ctrl && find_preset(presets, c).is_some() => {
            Some(Action::ApplyPreset(c))
        }
        _ => None,
    }
}

/// Key reference shown in the player, one `(key, description)` per line.
pub fn help_lines(presets: &[Preset]) -> Vec<(String, String)> {
    let mut lines: Vec<(String, String)> = presets
        .iter()
        .map(|p| (p.key.to_string(), p.label.clone()))
        .collect();
    lines.push(("space".into(), "Pause / resume".into()));
    lines.push(("q".into(), "Quit".into()));
    lines
}
