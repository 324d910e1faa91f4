use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

use super::{
    action::{Command, CommandOutcome, Direction, WormId},
    config::{ApplePlacement, ConfigError, GameConfig, Ruleset, SPAWN_INSET},
    scene::Scene,
    state::{DeathCause, GameState, Position, Worm},
};

/// A worm that died this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Death {
    pub worm: WormId,
    pub cause: DeathCause,
}

/// A tongue that landed on another worm this step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bite {
    pub biter: WormId,
    pub victim: WormId,
    /// Index of the first petrified segment (0 = head)
    pub index: usize,
    /// Number of segments turned to stone
    pub severed: usize,
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Worms whose head was on an apple this step
    pub apples_eaten: Vec<WormId>,
    pub bites: Vec<Bite>,
    pub deaths: Vec<Death>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the session has ended
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine; the configuration must be able to spawn
    /// a session
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let width = self.config.grid_width as i32;
        let height = self.config.grid_height as i32;
        let length = self.config.initial_worm_length;

        let worms = match self.config.ruleset {
            Ruleset::Solo => vec![Worm::new(
                WormId(0),
                Position::new(width / 2, height / 2),
                Direction::Right,
                length,
            )],
            Ruleset::Duel | Ruleset::Battle => vec![
                Worm::new(
                    WormId(0),
                    Position::new(SPAWN_INSET, height - SPAWN_INSET - 1),
                    Direction::Up,
                    length,
                ),
                Worm::new(
                    WormId(1),
                    Position::new(width - SPAWN_INSET - 1, SPAWN_INSET),
                    Direction::Down,
                    length,
                ),
            ],
        };

        let mut state = GameState::new(
            worms,
            Vec::with_capacity(self.config.apple_count),
            self.config.grid_width,
            self.config.grid_height,
            self.config.ruleset,
        );

        for _ in 0..self.config.apple_count {
            let apple = self.place_apple(&state);
            state.apples.push(apple);
        }

        state
    }

    /// Apply one input command to a worm. Commands are meant to be applied
    /// in arrival order between steps; the last valid turn wins, and a turn
    /// is valid unless it reverses the worm's last move.
    pub fn apply_command(
        &self,
        state: &mut GameState,
        worm: WormId,
        command: Command,
    ) -> CommandOutcome {
        if command == Command::Quit {
            return CommandOutcome::Quit;
        }
        if state.game_over {
            return CommandOutcome::Ignored;
        }

        let ruleset = state.ruleset;
        let Some(target) = state.worms.get_mut(worm.index()).filter(|w| w.alive) else {
            return CommandOutcome::Ignored;
        };

        match command {
            Command::Turn(direction) => {
                if target.turn(direction) {
                    CommandOutcome::Applied
                } else {
                    CommandOutcome::Ignored
                }
            }
            Command::Bite if ruleset.allows_bite() => {
                target.start_bite(self.config.zombie_duration(), self.config.bite_duration());
                debug!(worm = worm.number(), "bite");
                CommandOutcome::Applied
            }
            Command::Bite => CommandOutcome::Ignored,
            Command::Quit => CommandOutcome::Quit,
        }
    }

    /// Execute one tick. `elapsed` is the frame time since the previous tick
    /// and feeds the effect timers and life credit.
    pub fn step(&mut self, state: &mut GameState, elapsed: Duration) -> StepResult {
        if state.game_over {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        let mut info = StepInfo::default();

        if state.ruleset.allows_bite() {
            info.bites = Self::resolve_bites(state);
            info.deaths.extend(
                info.bites
                    .iter()
                    .filter(|bite| bite.index == 0)
                    .map(|bite| Death {
                        worm: bite.victim,
                        cause: DeathCause::Bitten(bite.biter),
                    }),
            );
        }

        // All collisions are judged against the positions at the start of
        // the tick, before anyone moves or turns to stone.
        for death in self.detect_deaths(state) {
            let remains = state.worms[death.worm.index()].kill();
            debug!(
                worm = death.worm.number(),
                cause = ?death.cause,
                size = remains.len(),
                "worm died"
            );
            state.stones.extend(remains);
            info.deaths.push(death);
        }

        for index in 0..state.worms.len() {
            if !state.worms[index].alive {
                continue;
            }

            let ate = self.eat_apples(state, index);
            let worm = &mut state.worms[index];
            if ate {
                info.apples_eaten.push(worm.id);
            }

            // Zombies never grow
            let grow = ate && !worm.is_zombie();
            worm.advance(grow);
        }

        self.advance_timers(state, elapsed);
        state.steps += 1;

        let finished = match state.ruleset {
            Ruleset::Solo => state.dead_count() > 0,
            Ruleset::Duel | Ruleset::Battle => state.dead_count() == state.worms.len(),
        };

        if finished {
            state.game_over = true;
            if state.ruleset.declares_winner() {
                state.winner = self.resolve_winner(state);
            }
            let scores: Vec<u32> = state.worms.iter().map(|w| self.score(w)).collect();
            let winner = state.winner.map(WormId::number);
            info!(steps = state.steps, ?scores, ?winner, "game over");
        }

        StepResult {
            terminated: finished,
            info,
        }
    }

    /// Final or running score of one worm
    pub fn score(&self, worm: &Worm) -> u32 {
        worm.score(&self.config)
    }

    pub fn scene(&self, state: &GameState) -> Scene {
        Scene::capture(state, &self.config)
    }

    /// Petrify every worm hit by another worm's active tongue. At most one
    /// bite lands per victim; matches are found on the pre-bite bodies and
    /// applied afterwards.
    fn resolve_bites(state: &mut GameState) -> Vec<Bite> {
        let mut bites = Vec::new();

        for victim in state.living_worms() {
            let biters = state
                .living_worms()
                .filter(|b| b.id != victim.id && b.is_biting());

            'victim: for biter in biters {
                for cell in biter.tongue {
                    if let Some(index) = victim.body.iter().position(|&p| p == cell) {
                        bites.push(Bite {
                            biter: biter.id,
                            victim: victim.id,
                            index,
                            severed: 0,
                        });
                        break 'victim;
                    }
                }
            }
        }

        for bite in &mut bites {
            let severed = state.worms[bite.victim.index()].petrify_from(bite.index);
            bite.severed = severed.len();
            debug!(
                biter = bite.biter.number(),
                victim = bite.victim.number(),
                index = bite.index,
                severed = bite.severed,
                "bite landed"
            );
            state.stones.extend(severed);
        }

        bites
    }

    fn detect_deaths(&self, state: &GameState) -> Vec<Death> {
        state
            .living_worms()
            .filter_map(|worm| {
                self.check_collision(state, worm).map(|cause| Death {
                    worm: worm.id,
                    cause,
                })
            })
            .collect()
    }

    /// Check the worm's current head; first match wins
    fn check_collision(&self, state: &GameState, worm: &Worm) -> Option<DeathCause> {
        let head = worm.head()?;

        // Check wall collision
        if !state.is_in_bounds(head) {
            return Some(DeathCause::Wall);
        }

        // Check self-collision
        if worm.collides_with_body(head) {
            return Some(DeathCause::SelfCollision);
        }

        if state.ruleset.has_obstacles() {
            if let Some(other) = state
                .living_worms()
                .find(|other| other.id != worm.id && other.occupies(head))
            {
                return Some(DeathCause::Worm(other.id));
            }

            if state.is_stone(head) {
                return Some(DeathCause::Stone);
            }
        }

        None
    }

    /// Relocate every apple under the worm's head; true if any was eaten
    fn eat_apples(&mut self, state: &mut GameState, index: usize) -> bool {
        let Some(head) = state.worms[index].head() else {
            return false;
        };

        let eaten: Vec<usize> = state
            .apples
            .iter()
            .enumerate()
            .filter(|(_, apple)| **apple == head)
            .map(|(i, _)| i)
            .collect();

        for &i in &eaten {
            let apple = self.place_apple(state);
            state.apples[i] = apple;
            debug!(worm = index + 1, x = apple.x, y = apple.y, "apple eaten");
        }

        !eaten.is_empty()
    }

    fn advance_timers(&self, state: &mut GameState, elapsed: Duration) {
        let interval = self.config.life_credit_interval();

        state.life_clock += elapsed;
        while !interval.is_zero() && state.life_clock >= interval {
            state.life_clock -= interval;
            for worm in state.worms.iter_mut().filter(|w| w.alive && !w.is_zombie()) {
                worm.life_duration += 1;
            }
        }

        for worm in state.worms.iter_mut().filter(|w| w.alive) {
            worm.biting.advance(elapsed);
            if worm.zombie.advance(elapsed) {
                debug!(worm = worm.id.number(), "zombie mode over");
            }
        }
    }

    /// The single strictly highest score wins; a tie at the top has no winner
    fn resolve_winner(&self, state: &GameState) -> Option<WormId> {
        let mut best: Option<(WormId, u32)> = None;
        let mut tied = false;

        for worm in &state.worms {
            let score = worm.score(&self.config);
            match best {
                Some((_, high)) if score < high => {}
                Some((_, high)) if score == high => tied = true,
                _ => {
                    best = Some((worm.id, score));
                    tied = false;
                }
            }
        }

        if tied {
            None
        } else {
            best.map(|(id, _)| id)
        }
    }

    fn random_cell(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        Position::new(x, y)
    }

    /// Pick a cell for a new apple according to the placement policy
    fn place_apple(&mut self, state: &GameState) -> Position {
        match self.config.apple_placement {
            ApplePlacement::Anywhere => self.random_cell(),
            ApplePlacement::AvoidOccupied { max_attempts } => {
                let mut pos = self.random_cell();
                for _ in 1..max_attempts {
                    if !state.is_occupied(pos) {
                        break;
                    }
                    pos = self.random_cell();
                }
                pos
            }
        }
    }
}
