//! Key mapping from terminal events to game actions.
//!
//! Cursor keys on the letter block follow the shape of the hex neighbors:
//!
//! ```text
//!    w   e
//!  a   *   d
//!    z   x
//! ```

use crate::types::{Direction, GameAction};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    let step = |d| Some(GameAction::MoveCursor(d));
    match key.code {
        // Movement
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => step(Direction::East),
        KeyCode::Char('e') | KeyCode::Char('E') => step(Direction::NorthEast),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => step(Direction::NorthWest),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => step(Direction::West),
        KeyCode::Char('z') | KeyCode::Char('Z') => step(Direction::SouthWest),
        KeyCode::Down | KeyCode::Char('x') | KeyCode::Char('X') => step(Direction::SouthEast),

        // Rotation
        KeyCode::Char('.') | KeyCode::Char('>') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(GameAction::RotateRight)
        }
        KeyCode::Char(',') | KeyCode::Char('<') => Some(GameAction::RotateLeft),

        // Actions
        KeyCode::Char(' ') | KeyCode::Enter => Some(GameAction::Place),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Option<GameAction> {
        handle_key_event(KeyEvent::from(code))
    }

    #[test]
    fn test_movement_keys() {
        assert_eq!(
            key(KeyCode::Left),
            Some(GameAction::MoveCursor(Direction::West))
        );
        assert_eq!(
            key(KeyCode::Right),
            Some(GameAction::MoveCursor(Direction::East))
        );
        assert_eq!(
            key(KeyCode::Char('e')),
            Some(GameAction::MoveCursor(Direction::NorthEast))
        );
        assert_eq!(
            key(KeyCode::Char('W')),
            Some(GameAction::MoveCursor(Direction::NorthWest))
        );
        assert_eq!(
            key(KeyCode::Char('z')),
            Some(GameAction::MoveCursor(Direction::SouthWest))
        );
        assert_eq!(
            key(KeyCode::Down),
            Some(GameAction::MoveCursor(Direction::SouthEast))
        );
    }

    #[test]
    fn test_every_direction_reachable() {
        for d in Direction::ALL {
            let found = "wedaxz"
                .chars()
                .any(|c| key(KeyCode::Char(c)) == Some(GameAction::MoveCursor(d)));
            assert!(found, "no key for {:?}", d);
        }
    }

    #[test]
    fn test_rotation_keys() {
        assert_eq!(key(KeyCode::Char('.')), Some(GameAction::RotateRight));
        assert_eq!(key(KeyCode::Char('s')), Some(GameAction::RotateRight));
        assert_eq!(key(KeyCode::Char(',')), Some(GameAction::RotateLeft));
        assert_eq!(key(KeyCode::Char('<')), Some(GameAction::RotateLeft));
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(key(KeyCode::Char(' ')), Some(GameAction::Place));
        assert_eq!(key(KeyCode::Enter), Some(GameAction::Place));
        assert_eq!(key(KeyCode::Char('R')), Some(GameAction::Restart));
        assert_eq!(key(KeyCode::Char('p')), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
