//! Key mapping from terminal events to input events.

use crate::types::{InputEvent, Key};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Normalize a terminal key event.
///
/// Presses and auto-repeats both count as key-downs; releases and keys
/// without an identifier (media keys, bare modifiers, ...) yield `None`.
pub fn event_from_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let mut shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let code = match key.code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => {
            shift = true;
            Key::Tab
        }
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };

    Some(InputEvent {
        key: code,
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        shift,
        alt: key.modifiers.contains(KeyModifiers::ALT),
    })
}

/// Check if the event should stop the host (Ctrl+C).
pub fn is_host_quit(event: &InputEvent) -> bool {
    event.ctrl && matches!(event.key, Key::Char('c') | Key::Char('C'))
}
