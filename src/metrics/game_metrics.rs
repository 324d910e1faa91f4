use std::time::{Duration, Instant};

use crate::game::{Scene, WormId};

/// Session clock and running tally across restarts
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Games won, indexed by worm
    pub wins: Vec<u32>,
    /// Finished games without a single winner
    pub draws: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            wins: Vec::new(),
            draws: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    /// Record a finished game. Draws are only counted for multi-worm games.
    pub fn on_game_over(&mut self, scene: &Scene) {
        self.games_played += 1;

        let best = scene.worms.iter().map(|w| w.score).max().unwrap_or(0);
        self.high_score = self.high_score.max(best);

        match scene.winner {
            Some(id) => self.record_win(id),
            None if scene.worms.len() > 1 => self.draws += 1,
            None => {}
        }
    }

    fn record_win(&mut self, id: WormId) {
        if self.wins.len() <= id.index() {
            self.wins.resize(id.index() + 1, 0);
        }
        self.wins[id.index()] += 1;
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
