//! Core game logic module for Battle Worms
//!
//! This module contains all the game rules without any I/O or rendering dependencies.
//! The front-end feeds it commands and elapsed time, and draws the [`Scene`] it produces.

pub mod action;
pub mod config;
pub mod engine;
pub mod scene;
pub mod state;

// Re-export commonly used types
pub use action::{Command, CommandOutcome, Direction, WormId};
pub use config::{ApplePlacement, ConfigError, GameConfig, Ruleset};
pub use engine::{Bite, Death, GameEngine, StepInfo, StepResult};
pub use scene::{CellTag, Scene, WormStatus};
pub use state::{DeathCause, EffectTimer, GameState, Position, Worm};
