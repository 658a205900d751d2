//! Key bindings
//!
//! | Key                      | Action                          |
//! |--------------------------|---------------------------------|
//! | `Tab` / `Shift+Tab`      | next / previous view            |
//! | `1`-`9`                  | jump to view                    |
//! | `↑` `k` / `↓` `j`        | move the process list cursor    |
//! | `r`                      | reload frame files              |
//! | `q`, `Esc`, `Ctrl+C`     | quit                            |

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use skyfetch_core::InputEvent;

/// Decode a key press; `None` for unbound keys
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(InputEvent::Quit);
    }

    match key.code {
        KeyCode::Tab => Some(InputEvent::NextView),
        KeyCode::BackTab => Some(InputEvent::PrevView),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|d| InputEvent::JumpTo(d as usize - 1)),
        KeyCode::Up | KeyCode::Char('k') => Some(InputEvent::CursorUp),
        KeyCode::Down | KeyCode::Char('j') => Some(InputEvent::CursorDown),
        KeyCode::Char('r') => Some(InputEvent::Reload),
        KeyCode::Char('q') | KeyCode::Esc => Some(InputEvent::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_navigation_keys() {
        assert_eq!(map_key(key(KeyCode::Tab)), Some(InputEvent::NextView));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
            Some(InputEvent::PrevView)
        );
        assert_eq!(map_key(key(KeyCode::Char('1'))), Some(InputEvent::JumpTo(0)));
        assert_eq!(map_key(key(KeyCode::Char('9'))), Some(InputEvent::JumpTo(8)));
        assert_eq!(map_key(key(KeyCode::Char('0'))), None);
    }

    #[test]
    fn test_cursor_keys() {
        assert_eq!(map_key(key(KeyCode::Up)), Some(InputEvent::CursorUp));
        assert_eq!(map_key(key(KeyCode::Char('j'))), Some(InputEvent::CursorDown));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), Some(InputEvent::Quit));
        assert_eq!(map_key(key(KeyCode::Esc)), Some(InputEvent::Quit));
        assert_eq!(
            map_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(InputEvent::Quit)
        );
        assert_eq!(map_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL)), None);
    }
}
