use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction, Ruleset, WormId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Command for one worm, queued until the next tick (quit is not)
    Worm(WormId, Command),
    Restart,
    /// Ctrl+C, handled outside the game
    Quit,
    None,
}

/// Maps keys to worm commands. Worm 1 plays on WASD with `e` to bite,
/// worm 2 on the arrow keys with `/` to bite. With a single worm both
/// key sets steer it.
pub struct InputHandler {
    ruleset: Ruleset,
}

impl InputHandler {
    pub fn new(ruleset: Ruleset) -> Self {
        Self { ruleset }
    }

    fn second_player(&self) -> WormId {
        match self.ruleset {
            Ruleset::Solo => WormId(0),
            Ruleset::Duel | Ruleset::Battle => WormId(1),
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let first = WormId(0);
        let second = self.second_player();

        match key.code {
            // Worm 2 - Arrow keys
            KeyCode::Up => KeyAction::Worm(second, Command::Turn(Direction::Up)),
            KeyCode::Down => KeyAction::Worm(second, Command::Turn(Direction::Down)),
            KeyCode::Left => KeyAction::Worm(second, Command::Turn(Direction::Left)),
            KeyCode::Right => KeyAction::Worm(second, Command::Turn(Direction::Right)),
            KeyCode::Char('/') => KeyAction::Worm(second, Command::Bite),

            // Worm 1 - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::Worm(first, Command::Turn(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Worm(first, Command::Turn(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Worm(first, Command::Turn(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Worm(first, Command::Turn(Direction::Right))
            }
            KeyCode::Char('e') | KeyCode::Char('E') => KeyAction::Worm(first, Command::Bite),

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                KeyAction::Worm(first, Command::Quit)
            }
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Ruleset::Battle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys_drive_second_worm() {
        let handler = InputHandler::new(Ruleset::Battle);

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Up)),
            KeyAction::Worm(WormId(1), Command::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            KeyAction::Worm(WormId(1), Command::Turn(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            KeyAction::Worm(WormId(1), Command::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            KeyAction::Worm(WormId(1), Command::Turn(Direction::Right))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('/'))),
            KeyAction::Worm(WormId(1), Command::Bite)
        );
    }

    #[test]
    fn test_wasd_keys_drive_first_worm() {
        let handler = InputHandler::new(Ruleset::Duel);

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            KeyAction::Worm(WormId(0), Command::Turn(Direction::Up))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            KeyAction::Worm(WormId(0), Command::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('s'))),
            KeyAction::Worm(WormId(0), Command::Turn(Direction::Down))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('d'))),
            KeyAction::Worm(WormId(0), Command::Turn(Direction::Right))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('e'))),
            KeyAction::Worm(WormId(0), Command::Bite)
        );
    }

    #[test]
    fn test_wasd_uppercase() {
        let handler = InputHandler::default();

        let w_upper = KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT);
        assert_eq!(
            handler.handle_key_event(w_upper),
            KeyAction::Worm(WormId(0), Command::Turn(Direction::Up))
        );
    }

    #[test]
    fn test_solo_uses_both_key_sets() {
        let handler = InputHandler::new(Ruleset::Solo);

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            KeyAction::Worm(WormId(0), Command::Turn(Direction::Left))
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('d'))),
            KeyAction::Worm(WormId(0), Command::Turn(Direction::Right))
        );
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::default();

        let quit = KeyAction::Worm(WormId(0), Command::Quit);

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q'))), quit);

        let q_upper = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(q_upper), quit);

        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), quit);
    }

    #[test]
    fn test_restart_key() {
        let handler = InputHandler::default();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('r'))), KeyAction::Restart);

        let r_upper = KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(r_upper), KeyAction::Restart);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::default();
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), KeyAction::None);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::default();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }
}
