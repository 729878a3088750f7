//! Statistics counters and the level, lines and score derived from them

use serde::Serialize;

/// Level never rises above this
pub const MAX_LEVEL: u32 = 10;
/// Clears (of any size) needed per level
pub const CLEARS_PER_LEVEL: u32 = 4;

/// Raw counters kept by the engine. They only ever increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Statistics {
    /// Pieces spawned into the well
    pub pieces_dropped: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub tetrises: u32,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a clear of `lines` rows at once. Anything outside 1..=4 is ignored.
    pub fn record_clear(&mut self, lines: u32) {
        match lines {
            1 => self.singles += 1,
            2 => self.doubles += 1,
            3 => self.triples += 1,
            4 => self.tetrises += 1,
            _ => {}
        }
    }

    /// Number of clear events regardless of size
    pub fn clears(&self) -> u32 {
        self.singles + self.doubles + self.triples + self.tetrises
    }

    pub fn summary(&self) -> Summary {
        Summary::from(self)
    }
}

/// What a scoreboard shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub level: u32,
    pub lines: u32,
    pub score: u32,
}

impl From<&Statistics> for Summary {
    fn from(stats: &Statistics) -> Self {
        let level = (1 + stats.clears() / CLEARS_PER_LEVEL).min(MAX_LEVEL);
        let lines = stats.singles + 2 * stats.doubles + 3 * stats.triples + 4 * stats.tetrises;
        let score = stats.pieces_dropped
            + 100 * stats.singles
            + 200 * stats.doubles
            + 400 * stats.triples
            + 800 * stats.tetrises;
        Self {
            level,
            lines,
            score,
        }
    }
}

/// Session scoreboard: the latest summary and the best score seen so far.
/// Lives for one process only.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    latest: Option<Summary>,
    high_score: u32,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed new statistics in. Returns true if the high score went up.
    pub fn update(&mut self, stats: &Statistics) -> bool {
        let summary = stats.summary();
        self.latest = Some(summary);
        if summary.score > self.high_score {
            self.high_score = summary.score;
            true
        } else {
            false
        }
    }

    /// Level shown before any statistics arrive is 1
    pub fn level(&self) -> u32 {
        self.latest.map_or(1, |s| s.level)
    }

    pub fn latest(&self) -> Option<Summary> {
        self.latest
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Start a new game; the high score is kept
    pub fn reset(&mut self) {
        self.latest = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_clear() {
        let mut stats = Statistics::new();
        stats.pieces_dropped = 2;
        stats.record_clear(1);
        let summary = stats.summary();
        assert_eq!(summary.level, 1);
        assert_eq!(summary.lines, 1);
        assert_eq!(summary.score, 102);
    }

    #[test]
    fn test_tetris() {
        let mut stats = Statistics::new();
        stats.record_clear(4);
        assert_eq!(stats.tetrises, 1);
        assert_eq!(stats.summary().lines, 4);
        assert_eq!(stats.summary().score, 800);
    }

    #[test]
    fn test_ignores_bad_counts() {
        let mut stats = Statistics::new();
        stats.record_clear(0);
        stats.record_clear(5);
        assert_eq!(stats, Statistics::new());
    }

    #[test]
    fn test_level_up_every_four_clears() {
        let mut stats = Statistics::new();
        for _ in 0..3 {
            stats.record_clear(2);
        }
        assert_eq!(stats.summary().level, 1);
        stats.record_clear(3);
        assert_eq!(stats.summary().level, 2);
    }

    #[test]
    fn test_level_is_capped() {
        let mut stats = Statistics::new();
        for _ in 0..100 {
            stats.record_clear(1);
        }
        assert_eq!(stats.summary().level, MAX_LEVEL);
    }

    #[test]
    fn test_mixed_lines_and_score() {
        let stats = Statistics {
            pieces_dropped: 50,
            singles: 1,
            doubles: 2,
            triples: 3,
            tetrises: 4,
        };
        let summary = stats.summary();
        assert_eq!(summary.lines, 1 + 4 + 9 + 16);
        assert_eq!(summary.score, 50 + 100 + 400 + 1200 + 3200);
        assert_eq!(summary.level, 1 + 10 / 4);
    }

    #[test]
    fn test_scoreboard_keeps_high_score() {
        let mut board = Scoreboard::new();
        assert_eq!(board.level(), 1);
        let mut stats = Statistics::new();
        stats.pieces_dropped = 10;
        assert!(board.update(&stats));
        assert_eq!(board.high_score(), 10);

        board.reset();
        stats.pieces_dropped = 3;
        assert!(!board.update(&stats));
        assert_eq!(board.high_score(), 10);
        assert_eq!(board.latest().map(|s| s.score), Some(3));
    }
}
