//! Play session controller
//!
//! Sits between an input source and one [`Game`]. It owns the start, pause
//! and quit lifecycle, turns base timer ticks into game steps through a
//! [`Cadence`], and keeps the scoreboard current. Everything it wants a
//! front end to show comes back as [`Report`]s.

use crate::cadence::Cadence;
use crate::game::{Action, Game, Outcome};
use crate::input::{Command, KeyBindings};
use crate::intent::Intent;
use crate::score::{Scoreboard, Statistics, Summary};
use crate::settings::Settings;
use serde::Serialize;
use std::time::Duration;

/// Something a front end should react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Report {
    Started { seed: Option<u64> },
    Intent(Intent),
    /// A command was refused; front ends usually beep
    Rejected { action: Action },
    Statistics {
        stats: Statistics,
        summary: Summary,
        high_score: u32,
    },
    Paused { paused: bool },
    GameOver { summary: Summary, high_score: u32 },
    Stopped,
}

pub struct Session {
    game: Option<Game>,
    keys: KeyBindings,
    cadence: Cadence,
    scoreboard: Scoreboard,
    seed: Option<u64>,
    show_ghost: bool,
    running: bool,
    paused: bool,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            game: None,
            keys: KeyBindings::from_settings(settings),
            cadence: Cadence::new(Duration::from_millis(settings.timing.tick_ms)),
            scoreboard: Scoreboard::new(),
            seed: settings.gameplay.seed,
            show_ghost: settings.visual.show_ghost,
            running: false,
            paused: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The game of the current or last run, if one was ever started
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Handle a named key. Unbound keys are ignored.
    pub fn key(&mut self, key: &str) -> Vec<Report> {
        match self.keys.command(key) {
            Some(command) => self.command(command),
            None => {
                tracing::trace!("Unbound key {:?}", key);
                Vec::new()
            }
        }
    }

    pub fn command(&mut self, command: Command) -> Vec<Report> {
        if !self.running {
            // Only start is accepted between games
            return match command {
                Command::Start => self.start(),
                _ => Vec::new(),
            };
        }
        match command {
            Command::Start => Vec::new(),
            Command::Quit => {
                tracing::info!("Session quit");
                self.running = false;
                self.paused = false;
                vec![Report::Stopped]
            }
            Command::Pause => {
                self.paused = !self.paused;
                tracing::debug!(paused = self.paused, "Pause toggled");
                vec![Report::Paused {
                    paused: self.paused,
                }]
            }
            Command::Game(_) if self.paused => Vec::new(),
            Command::Game(action) => self.action(action),
        }
    }

    /// One base timer tick. Returns nothing unless the game stepped.
    pub fn tick(&mut self) -> Vec<Report> {
        if !self.running || self.paused {
            return Vec::new();
        }
        if !self.cadence.advance(self.scoreboard.level()) {
            return Vec::new();
        }
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        let outcome = game.tick();
        if outcome.needs_delay() {
            self.cadence.hiccup();
        }
        self.after_step(Vec::new())
    }

    fn start(&mut self) -> Vec<Report> {
        let seed = self.seed;
        let game = self.game.get_or_insert_with(|| match seed {
            Some(seed) => Game::with_seed(seed),
            None => Game::new(),
        });
        // Reset last so the opening spawn uses the ghost setting
        game.set_show_ghost(self.show_ghost);
        game.reset();
        self.scoreboard.reset();
        self.cadence.hiccup();
        self.running = true;
        self.paused = false;
        tracing::info!(
            ?seed,
            step = ?self.cadence.step_interval(self.scoreboard.level()),
            "Session started"
        );

        let mut reports = vec![Report::Started { seed }];
        reports.extend(game.take_intents().into_iter().map(Report::Intent));
        reports
    }

    fn action(&mut self, action: Action) -> Vec<Report> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        let mut reports = Vec::new();
        match action {
            // A drop is a model update like a tick; a refused drop is silent
            Action::HardDrop => {
                let outcome = game.hard_drop();
                if outcome == Outcome::Rejected {
                    return reports;
                }
                if outcome.needs_delay() {
                    self.cadence.hiccup();
                }
                return self.after_step(reports);
            }
            _ => {
                if !game.process_action(action) {
                    reports.push(Report::Rejected { action });
                }
            }
        }
        reports.extend(game.take_intents().into_iter().map(Report::Intent));
        if game.is_game_over() {
            reports.extend(self.finish());
        }
        reports
    }

    /// Collect intents and statistics after the game stepped
    fn after_step(&mut self, mut reports: Vec<Report>) -> Vec<Report> {
        let Some(game) = self.game.as_mut() else {
            return reports;
        };
        reports.extend(game.take_intents().into_iter().map(Report::Intent));
        let stats = *game.statistics();
        let game_over = game.is_game_over();
        if self.scoreboard.update(&stats) {
            tracing::debug!(high_score = self.scoreboard.high_score(), "New high score");
        }
        reports.push(Report::Statistics {
            stats,
            summary: stats.summary(),
            high_score: self.scoreboard.high_score(),
        });
        if game_over {
            reports.extend(self.finish());
        }
        reports
    }

    fn finish(&mut self) -> Vec<Report> {
        let stats = self
            .game
            .as_ref()
            .map(|game| *game.statistics())
            .unwrap_or_default();
        self.scoreboard.update(&stats);
        self.running = false;
        self.paused = false;
        let summary = stats.summary();
        tracing::info!(?summary, "Game over");
        vec![
            Report::GameOver {
                summary,
                high_score: self.scoreboard.high_score(),
            },
            Report::Stopped,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tetromino::Shape;

    fn seeded(seed: u64) -> Session {
        let mut settings = Settings::default();
        settings.gameplay.seed = Some(seed);
        Session::new(&settings)
    }

    /// Running session playing `game` as is, without the reset `start` does
    fn playing(game: Game) -> Session {
        let mut session = Session::new(&Settings::default());
        session.game = Some(game);
        session.running = true;
        session
    }

    fn count_intents(reports: &[Report]) -> usize {
        reports
            .iter()
            .filter(|r| matches!(r, Report::Intent(_)))
            .count()
    }

    #[test]
    fn test_only_start_before_running() {
        let mut session = seeded(1);
        assert!(session.key("Left").is_empty());
        assert!(session.key("p").is_empty());
        assert!(session.tick().is_empty());
        assert!(session.game().is_none());

        let reports = session.key("F10");
        assert_eq!(reports[0], Report::Started { seed: Some(1) });
        // Ghost, piece, next
        assert_eq!(count_intents(&reports), 3);
        assert!(session.is_running());
    }

    #[test]
    fn test_game_steps_every_period() {
        let mut session = seeded(2);
        session.key("F10");
        for _ in 0..9 {
            assert!(session.tick().is_empty());
        }
        let reports = session.tick();
        assert!(count_intents(&reports) > 0);
        assert!(matches!(reports.last(), Some(Report::Statistics { .. })));
        assert_eq!(session.game().map(|g| g.position().0), Some(1));
    }

    #[test]
    fn test_clear_waits_one_full_period() {
        use crate::bag::Bag;
        use crate::game::SPAWN_COL;
        use crate::well::{BOARD_WIDTH, Well};

        let mut well = Well::new();
        for col in 0..BOARD_WIDTH as i32 {
            if !(SPAWN_COL..SPAWN_COL + 4).contains(&col) {
                well.fill(23, col, 'X');
            }
        }
        let seed = (0u64..)
            .find(|&seed| Bag::with_seed(seed).peek_next() == Shape::I)
            .unwrap();
        let mut session = playing(Game::from_parts(well, Bag::with_seed(seed)));

        // Part way into a period, so the flush would come early without a restart
        for _ in 0..6 {
            assert!(session.tick().is_empty());
        }
        let reports = session.key("Space");
        assert!(reports
            .iter()
            .any(|r| matches!(r, Report::Intent(Intent::Highlight { .. }))));

        for _ in 0..9 {
            assert!(session.tick().is_empty());
        }
        let reports = session.tick();
        assert!(matches!(reports.first(), Some(Report::Intent(Intent::Clear { .. }))));
        assert_eq!(session.scoreboard().latest().map(|s| s.lines), Some(1));
    }

    #[test]
    fn test_pause_freezes_game() {
        let mut session = seeded(3);
        session.key("F10");
        assert_eq!(session.key("p"), vec![Report::Paused { paused: true }]);
        for _ in 0..30 {
            assert!(session.tick().is_empty());
        }
        assert!(session.key("Right").is_empty());
        assert_eq!(session.game().map(|g| g.position()), Some((0, 3)));

        assert_eq!(session.key("p"), vec![Report::Paused { paused: false }]);
        assert!(!session.key("Right").is_empty());
    }

    #[test]
    fn test_refused_move_is_reported() {
        let mut session = seeded(4);
        session.key("F10");
        let mut refused = None;
        for _ in 0..10 {
            let reports = session.key("Left");
            if let Some(Report::Rejected { action }) = reports.first() {
                refused = Some(*action);
                assert_eq!(reports.len(), 1);
                break;
            }
        }
        assert_eq!(refused, Some(Action::MoveLeft));
    }

    #[test]
    fn test_quit_stops_and_start_resets() {
        let mut session = seeded(5);
        session.key("F10");
        session.key("Space");
        assert_eq!(session.key("Esc"), vec![Report::Stopped]);
        assert!(!session.is_running());
        assert!(session.key("Space").is_empty());

        session.key("F10");
        let stats = session.game().map(|g| *g.statistics());
        assert_eq!(stats.map(|s| s.pieces_dropped), Some(1));
    }

    #[test]
    fn test_drops_until_game_over() {
        let mut session = seeded(6);
        session.key("F10");
        let mut over = false;
        for _ in 0..100 {
            let reports = session.key("Space");
            if reports.iter().any(|r| matches!(r, Report::GameOver { .. })) {
                assert_eq!(reports.last(), Some(&Report::Stopped));
                over = true;
                break;
            }
        }
        assert!(over);
        assert!(!session.is_running());
        assert!(session.scoreboard().high_score() > 0);
        assert!(session.tick().is_empty());
    }

    #[test]
    fn test_ghost_setting_applied() {
        let mut settings = Settings::default();
        settings.gameplay.seed = Some(7);
        settings.visual.show_ghost = false;
        let mut session = Session::new(&settings);
        let reports = session.key("F10");
        assert!(!reports
            .iter()
            .any(|r| matches!(r, Report::Intent(Intent::DisplayGhost { .. }))));
    }

    #[test]
    fn test_report_json() {
        let json = serde_json::to_string(&Report::Rejected {
            action: Action::RotateCw,
        })
        .unwrap();
        assert_eq!(json, r#"{"rejected":{"action":"RotateCw"}}"#);
        assert_eq!(serde_json::to_string(&Report::Stopped).unwrap(), r#""stopped""#);
    }
}
