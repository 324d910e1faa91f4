//! Render snapshot of a session
//!
//! A [`Scene`] is what the front-end draws: every occupied cell tagged with
//! what occupies it, plus per-worm score lines and the outcome. It holds no
//! references into the game state.

use std::collections::HashMap;
use std::time::Duration;

use super::action::WormId;
use super::config::GameConfig;
use super::state::{GameState, Position};

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellTag {
    WormHead(WormId),
    WormBody(WormId),
    Tongue(WormId),
    Apple,
    Stone,
}

/// Score line for one worm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WormStatus {
    pub id: WormId,
    pub score: u32,
    pub length: usize,
    pub life_duration: u32,
    pub alive: bool,
    pub zombie: bool,
    /// Zombie time left, zero when not a zombie
    pub zombie_remaining: Duration,
    pub biting: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    /// Occupied cells in draw order; later entries are drawn on top
    pub cells: Vec<(Position, CellTag)>,
    pub worms: Vec<WormStatus>,
    pub steps: u32,
    pub game_over: bool,
    pub winner: Option<WormId>,
}

impl Scene {
    pub fn capture(state: &GameState, config: &GameConfig) -> Self {
        let mut cells = Vec::new();

        cells.extend(state.stones.iter().map(|&pos| (pos, CellTag::Stone)));
        cells.extend(state.apples.iter().map(|&pos| (pos, CellTag::Apple)));

        for worm in state.living_worms() {
            cells.extend(
                worm.body_segments()
                    .iter()
                    .map(|&pos| (pos, CellTag::WormBody(worm.id))),
            );
            if let Some(head) = worm.head() {
                cells.push((head, CellTag::WormHead(worm.id)));
            }
            if worm.is_biting() {
                cells.extend(
                    worm.tongue
                        .iter()
                        .filter(|&&pos| state.is_in_bounds(pos))
                        .map(|&pos| (pos, CellTag::Tongue(worm.id))),
                );
            }
        }

        let worms = state
            .worms
            .iter()
            .map(|worm| WormStatus {
                id: worm.id,
                score: worm.score(config),
                length: worm.scored_length(),
                life_duration: worm.life_duration,
                alive: worm.alive,
                zombie: worm.is_zombie(),
                zombie_remaining: worm.zombie.remaining(),
                biting: worm.is_biting(),
            })
            .collect();

        Self {
            width: state.grid_width,
            height: state.grid_height,
            cells,
            worms,
            steps: state.steps,
            game_over: state.game_over,
            winner: state.winner,
        }
    }

    /// Topmost tag per cell
    pub fn cell_map(&self) -> HashMap<Position, CellTag> {
        self.cells.iter().copied().collect()
    }
}
