//! Key bindings: normal and vim-style.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    /// Place an orb on the cursor cell / confirm a menu entry.
    Activate,
    Reset,
    Pause,
    Quit,
    /// Digit shortcut (menu player count).
    Digit(u8),
    None,
}

/// Map key event to game action. Supports both normal (arrows, Enter/Space) and vim (hjkl).
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent {
        code, modifiers, ..
    } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !no_mod {
        return Action::None;
    }
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('p') => Action::Pause,
        KeyCode::Char('r' | 'R') => Action::Reset,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::Left | KeyCode::Char('h') => Action::Left,
        KeyCode::Right | KeyCode::Char('l') => Action::Right,
        KeyCode::Enter | KeyCode::Char(' ') => Action::Activate,
        KeyCode::Char(c @ '0'..='9') => Action::Digit(c as u8 - b'0'),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_vim_keys_agree() {
        assert_eq!(key_to_action(press(KeyCode::Up)), Action::Up);
        assert_eq!(key_to_action(press(KeyCode::Char('k'))), Action::Up);
        assert_eq!(key_to_action(press(KeyCode::Char('j'))), Action::Down);
        assert_eq!(key_to_action(press(KeyCode::Char('h'))), Action::Left);
        assert_eq!(key_to_action(press(KeyCode::Right)), Action::Right);
    }

    #[test]
    fn activate_reset_quit() {
        assert_eq!(key_to_action(press(KeyCode::Enter)), Action::Activate);
        assert_eq!(key_to_action(press(KeyCode::Char(' '))), Action::Activate);
        assert_eq!(key_to_action(press(KeyCode::Char('r'))), Action::Reset);
        assert_eq!(key_to_action(press(KeyCode::Esc)), Action::Quit);
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn digits_and_modified_keys() {
        assert_eq!(key_to_action(press(KeyCode::Char('3'))), Action::Digit(3));
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::ALT)),
            Action::None
        );
    }
}
