//! Input translation: named keys to discrete commands
//!
//! Keys arrive as names ("Left", "a", "Space", "F10"). Matching ignores case,
//! so "A" and "a" are the same key. Session commands (start, pause, quit)
//! are kept apart from game actions because the engine never sees them.

use crate::game::Action;
use crate::settings::Settings;

/// Everything an input layer can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Game(Action),
    Start,
    Pause,
    Quit,
}

/// Key bindings - supports multiple keys per command
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: Vec<(String, Command)>,
}

impl KeyBindings {
    /// Normalize a key name for comparison
    fn normalize(key: &str) -> String {
        match key.trim().to_lowercase().as_str() {
            "escape" => "esc".to_string(),
            other => other.to_string(),
        }
    }

    /// Create keybindings from settings
    pub fn from_settings(settings: &Settings) -> Self {
        let keys = &settings.keys;
        let table: [(&[String], Command); 10] = [
            (keys.move_left.as_slice(), Command::Game(Action::MoveLeft)),
            (keys.move_right.as_slice(), Command::Game(Action::MoveRight)),
            (keys.move_down.as_slice(), Command::Game(Action::MoveDown)),
            (keys.rotate_cw.as_slice(), Command::Game(Action::RotateCw)),
            (keys.rotate_ccw.as_slice(), Command::Game(Action::RotateCcw)),
            (keys.hold.as_slice(), Command::Game(Action::Hold)),
            (keys.drop.as_slice(), Command::Game(Action::HardDrop)),
            (keys.pause.as_slice(), Command::Pause),
            (keys.quit.as_slice(), Command::Quit),
            (keys.start.as_slice(), Command::Start),
        ];

        let mut bindings = Vec::new();
        for (names, command) in table {
            for name in names {
                let key = Self::normalize(name);
                // First binding wins when a key is listed twice
                if bindings.iter().any(|(bound, _)| *bound == key) {
                    tracing::warn!("Key {:?} bound more than once, keeping first", name);
                    continue;
                }
                bindings.push((key, command));
            }
        }
        Self { bindings }
    }

    /// Look up the command bound to a key
    pub fn command(&self, key: &str) -> Option<Command> {
        let key = Self::normalize(key);
        self.bindings
            .iter()
            .find(|(bound, _)| *bound == key)
            .map(|&(_, command)| command)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keys = KeyBindings::default();
        assert_eq!(keys.command("Left"), Some(Command::Game(Action::MoveLeft)));
        assert_eq!(keys.command("a"), Some(Command::Game(Action::MoveLeft)));
        assert_eq!(keys.command("e"), Some(Command::Game(Action::RotateCw)));
        assert_eq!(keys.command("q"), Some(Command::Game(Action::RotateCcw)));
        assert_eq!(keys.command("w"), Some(Command::Game(Action::Hold)));
        assert_eq!(keys.command("Space"), Some(Command::Game(Action::HardDrop)));
        assert_eq!(keys.command("F10"), Some(Command::Start));
        assert_eq!(keys.command("Escape"), Some(Command::Quit));
        assert_eq!(keys.command("z"), None);
    }

    #[test]
    fn test_case_insensitive() {
        let keys = KeyBindings::default();
        assert_eq!(keys.command("D"), Some(Command::Game(Action::MoveRight)));
        assert_eq!(keys.command("P"), Some(Command::Pause));
        assert_eq!(keys.command("left"), keys.command("LEFT"));
    }

    #[test]
    fn test_custom_bindings() {
        let mut settings = Settings::default();
        settings.keys.rotate_cw = vec!["x".to_string(), "Up".to_string()];
        settings.keys.hold = vec!["c".to_string()];
        let keys = KeyBindings::from_settings(&settings);
        assert_eq!(keys.command("x"), Some(Command::Game(Action::RotateCw)));
        assert_eq!(keys.command("up"), Some(Command::Game(Action::RotateCw)));
        assert_eq!(keys.command("c"), Some(Command::Game(Action::Hold)));
        assert_eq!(keys.command("w"), None);
    }

    #[test]
    fn test_duplicate_key_keeps_first() {
        let mut settings = Settings::default();
        settings.keys.pause = vec!["a".to_string()];
        let keys = KeyBindings::from_settings(&settings);
        assert_eq!(keys.command("a"), Some(Command::Game(Action::MoveLeft)));
    }
}
