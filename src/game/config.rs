use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Distance of the two-worm spawn points from the grid corners
pub const SPAWN_INSET: i32 = 6;

/// Smallest grid that fits both worms at their spawn points
pub const MIN_VERSUS_GRID: usize = 2 * SPAWN_INSET as usize + 2;

/// Which rules a session is played under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    /// One worm; the game ends as soon as it dies
    Solo,
    /// Two worms that only die on walls and themselves
    Duel,
    /// Two worms that collide with each other and with stones, and can bite
    Battle,
}

impl Ruleset {
    /// Whether worms collide with other worms and with stones
    pub fn has_obstacles(self) -> bool {
        self == Ruleset::Battle
    }

    pub fn allows_bite(self) -> bool {
        self == Ruleset::Battle
    }

    pub fn declares_winner(self) -> bool {
        self == Ruleset::Battle
    }
}

/// Where consumed apples are moved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum ApplePlacement {
    /// Any cell in bounds, even one covered by a worm or a stone
    Anywhere,
    /// Resample up to `max_attempts` times looking for a free cell, then
    /// accept the last sample
    AvoidOccupied { max_attempts: u32 },
}

/// Reasons a configuration cannot start a session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small, {ruleset:?} needs at least {min}x{min}")]
    GridTooSmall {
        width: usize,
        height: usize,
        min: usize,
        ruleset: Ruleset,
    },
    #[error("initial worm length must be at least 1")]
    ZeroWormLength,
    #[error("initial worm length {length} does not fit the grid (max {max})")]
    WormTooLong { length: usize, max: usize },
    #[error("apple_count must be at least 1")]
    NoApples,
    #[error("tick_rate_hz must be at least 1")]
    ZeroTickRate,
    #[error("life_credit_interval_ms must be at least 1")]
    ZeroLifeInterval,
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub ruleset: Ruleset,
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of each worm
    pub initial_worm_length: usize,
    /// Number of apples kept on the board
    pub apple_count: usize,
    /// Ticks per second driven by the front-end
    pub tick_rate_hz: u32,

    /// How long zombie mode lasts after a bite
    pub zombie_duration_ms: u64,
    /// How long the tongue stays out after a bite
    pub bite_duration_ms: u64,
    /// Alive time needed for one point of life credit
    pub life_credit_interval_ms: u64,

    // Score weights
    /// Points per body segment
    pub length_weight: u32,
    /// Points per credited second alive
    pub life_weight: u32,

    pub apple_placement: ApplePlacement,
    /// Fixed RNG seed; a fresh one is drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            ruleset: Ruleset::Battle,
            grid_width: 64,
            grid_height: 48,
            initial_worm_length: 3,
            apple_count: 3,
            tick_rate_hz: 15,
            zombie_duration_ms: 8000,
            bite_duration_ms: 250,
            life_credit_interval_ms: 1000,
            length_weight: 100,
            life_weight: 5,
            apple_placement: ApplePlacement::Anywhere,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Single worm on the default grid
    pub fn solo() -> Self {
        Self {
            ruleset: Ruleset::Solo,
            ..Default::default()
        }
    }

    /// Two worms without bites or stones
    pub fn duel() -> Self {
        Self {
            ruleset: Ruleset::Duel,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(20, 20)
    }

    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.tick_rate_hz.max(1)))
    }

    pub fn zombie_duration(&self) -> Duration {
        Duration::from_millis(self.zombie_duration_ms)
    }

    pub fn bite_duration(&self) -> Duration {
        Duration::from_millis(self.bite_duration_ms)
    }

    pub fn life_credit_interval(&self) -> Duration {
        Duration::from_millis(self.life_credit_interval_ms)
    }

    /// Read a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Check that a session can be spawned with this configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_worm_length == 0 {
            return Err(ConfigError::ZeroWormLength);
        }

        let min = match self.ruleset {
            Ruleset::Solo => 2,
            Ruleset::Duel | Ruleset::Battle => MIN_VERSUS_GRID,
        };
        if self.grid_width < min || self.grid_height < min {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
                min,
                ruleset: self.ruleset,
            });
        }

        // Bodies trail behind the head and must start inside the grid
        let max = match self.ruleset {
            Ruleset::Solo => self.grid_width / 2 + 1,
            Ruleset::Duel | Ruleset::Battle => SPAWN_INSET as usize + 1,
        };
        if self.initial_worm_length > max {
            return Err(ConfigError::WormTooLong {
                length: self.initial_worm_length,
                max,
            });
        }

        if self.apple_count == 0 {
            return Err(ConfigError::NoApples);
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if self.life_credit_interval_ms == 0 {
            return Err(ConfigError::ZeroLifeInterval);
        }

        Ok(())
    }
}
