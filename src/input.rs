//! Key mapping and held-key tracking for terminals.
//!
//! Most terminals only emit presses and auto-repeats, so a movement key is
//! treated as held until it goes quiet for a few frames. If the terminal
//! reports releases, those are trusted instead.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::constants::KEY_RELEASE_TIMEOUT_FRAMES;
use crate::entities::Direction;
use crate::world::MovementCommands;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
    Restart,
    /// Ctrl+C / Ctrl+D in raw mode: treated like closing the window.
    WindowClose,
}

pub fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        _ => None,
    }
}

/// Maps a key press to a command. Releases never trigger commands.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => Some(Command::WindowClose),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::Restart),
        code => direction_for(code).map(Command::Move),
    }
}

#[derive(Clone, Debug)]
pub struct HeldKeys {
    last_seen: [Option<u64>; 4],
    releases_reported: bool,
    timeout_frames: u64,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::with_timeout(KEY_RELEASE_TIMEOUT_FRAMES)
    }

    pub fn with_timeout(timeout_frames: u64) -> Self {
        HeldKeys { last_seen: [None; 4], releases_reported: false, timeout_frames }
    }

    fn slot(direction: Direction) -> usize {
        match direction {
            Direction::Left => 0,
            Direction::Right => 1,
            Direction::Up => 2,
            Direction::Down => 3,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent, frame: u64) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }
        let Some(direction) = direction_for(key.code) else {
            return;
        };
        let slot = Self::slot(direction);
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => self.last_seen[slot] = Some(frame),
            KeyEventKind::Release => {
                self.releases_reported = true;
                self.last_seen[slot] = None;
            }
        }
    }

    /// Directions held as of `frame`, expiring stale keys when releases are not reported.
    pub fn movement(&mut self, frame: u64) -> MovementCommands {
        let mut commands = MovementCommands::none();
        for direction in Direction::ALL {
            let slot = Self::slot(direction);
            if let Some(seen) = self.last_seen[slot] {
                if !self.releases_reported && frame.saturating_sub(seen) >= self.timeout_frames {
                    self.last_seen[slot] = None;
                } else {
                    commands.set(direction, true);
                }
            }
        }
        commands
    }

    pub fn clear(&mut self) {
        self.last_seen = [None; 4];
    }

    pub fn releases_reported(&self) -> bool {
        self.releases_reported
    }
}

impl Default for HeldKeys {
    fn default() -> Self {
        HeldKeys::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn release(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Release)
    }

    #[test]
    fn test_command_mapping() {
        assert_eq!(command_for(&press(KeyCode::Esc)), Some(Command::Quit));
        assert_eq!(command_for(&press(KeyCode::Char('q'))), Some(Command::Quit));
        assert_eq!(command_for(&press(KeyCode::Char(' '))), Some(Command::Restart));
        assert_eq!(command_for(&press(KeyCode::Left)), Some(Command::Move(Direction::Left)));
        assert_eq!(command_for(&press(KeyCode::Char('s'))), Some(Command::Move(Direction::Down)));
        assert_eq!(
            command_for(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Command::WindowClose)
        );
        assert_eq!(command_for(&release(KeyCode::Esc)), None);
        assert_eq!(command_for(&press(KeyCode::Enter)), None);
    }

    #[test]
    fn test_tap_expires_after_timeout() {
        let mut keys = HeldKeys::with_timeout(3);
        keys.handle_key(&press(KeyCode::Left), 10);
        assert!(keys.movement(10).left);
        assert!(keys.movement(12).left);
        assert!(!keys.movement(13).left);
        assert!(!keys.movement(14).left);
    }

    #[test]
    fn test_repeats_keep_key_held() {
        let mut keys = HeldKeys::with_timeout(3);
        keys.handle_key(&press(KeyCode::Up), 0);
        for frame in 1..20 {
            keys.handle_key(&KeyEvent::new_with_kind(KeyCode::Up, KeyModifiers::NONE, KeyEventKind::Repeat), frame);
            assert!(keys.movement(frame).up);
        }
    }

    #[test]
    fn test_several_directions_at_once() {
        let mut keys = HeldKeys::new();
        keys.handle_key(&press(KeyCode::Left), 0);
        keys.handle_key(&press(KeyCode::Char('w')), 0);
        let movement = keys.movement(1);
        assert!(movement.left && movement.up);
        assert!(!movement.right && !movement.down);
    }

    #[test]
    fn test_reported_release_disables_timeout() {
        let mut keys = HeldKeys::with_timeout(2);
        keys.handle_key(&press(KeyCode::Down), 0);
        keys.handle_key(&release(KeyCode::Right), 0);
        assert!(keys.releases_reported());
        assert!(keys.movement(100).down);

        keys.handle_key(&release(KeyCode::Down), 101);
        assert!(!keys.movement(101).down);
    }

    #[test]
    fn test_clear_drops_all_keys() {
        let mut keys = HeldKeys::new();
        keys.handle_key(&press(KeyCode::Right), 0);
        keys.clear();
        assert_eq!(keys.movement(0), MovementCommands::none());
    }
}
