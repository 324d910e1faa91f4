//! Battle Worms - a two-player Nibbles clone for the terminal
//!
//! This library provides:
//! - Core game rules and the tick engine (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering of scenes (render module)
//! - Session statistics (metrics module)
//! - The interactive driver loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
