use std::time::Duration;

use super::action::{Direction, WormId};
use super::config::{GameConfig, Ruleset};

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position `steps` cells in a direction
    pub fn moved_in_direction(&self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * steps, dy * steps)
    }
}

/// Frame time accumulated by a temporary effect (zombie mode, bite window)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectTimer {
    elapsed: Duration,
    duration: Duration,
    active: bool,
}

impl EffectTimer {
    /// (Re)start the effect from zero
    pub fn start(&mut self, duration: Duration) {
        self.elapsed = Duration::ZERO;
        self.duration = duration;
        self.active = !duration.is_zero();
    }

    /// Add frame time; returns true on the call that ends the effect
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.active {
            return false;
        }

        self.elapsed += elapsed;
        if self.elapsed >= self.duration {
            self.active = false;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn remaining(&self) -> Duration {
        if self.active {
            self.duration.saturating_sub(self.elapsed)
        } else {
            Duration::ZERO
        }
    }
}

/// A worm in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Worm {
    pub id: WormId,
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction the next move will take
    pub direction: Direction,
    /// Direction of the last move; turns are checked against it
    pub moved_direction: Direction,
    pub alive: bool,
    /// Seconds of alive time credited towards the score
    pub life_duration: u32,
    /// Strike reach, two and three cells ahead of the head
    pub tongue: [Position; 2],
    pub zombie: EffectTimer,
    pub biting: EffectTimer,
    /// Body length when the worm died
    pub size_at_death: usize,
}

impl Worm {
    /// Create a new worm with its body trailing behind the head
    pub fn new(id: WormId, head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        // Add initial body segments behind the head
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx, -dy);

        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(back_dx, back_dy));
        }

        Self {
            id,
            body,
            direction,
            moved_direction: direction,
            alive: true,
            life_duration: 0,
            tongue: Self::tongue_from(head, direction),
            zombie: EffectTimer::default(),
            biting: EffectTimer::default(),
            size_at_death: 0,
        }
    }

    fn tongue_from(head: Position, direction: Direction) -> [Position; 2] {
        [
            head.moved_in_direction(direction, 2),
            head.moved_in_direction(direction, 3),
        ]
    }

    /// Get the head position, if the worm still has a body
    pub fn head(&self) -> Option<Position> {
        self.body.first().copied()
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        self.body.get(1..).unwrap_or(&[])
    }

    /// Check if position collides with worm body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if position is covered by any segment, head included
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Face a new direction unless it would reverse into the neck. Several
    /// turns between two moves are all checked against the last move.
    pub fn turn(&mut self, direction: Direction) -> bool {
        if self.moved_direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Enter zombie mode with the tongue out
    pub fn start_bite(&mut self, zombie_duration: Duration, bite_duration: Duration) {
        self.zombie.start(zombie_duration);
        self.biting.start(bite_duration);
    }

    pub fn is_zombie(&self) -> bool {
        self.zombie.is_active()
    }

    pub fn is_biting(&self) -> bool {
        self.biting.is_active()
    }

    /// Move worm in current direction, growing if should_grow is true
    pub fn advance(&mut self, should_grow: bool) {
        let Some(head) = self.head() else {
            return;
        };

        if !should_grow {
            self.body.pop();
        }

        let new_head = head.moved_in_direction(self.direction, 1);
        self.body.insert(0, new_head);
        self.moved_direction = self.direction;
        self.tongue = Self::tongue_from(new_head, self.direction);
    }

    /// Cut the body at `index`; the severed run is returned. Losing the
    /// head kills the worm.
    pub fn petrify_from(&mut self, index: usize) -> Vec<Position> {
        let severed = self.body.split_off(index.min(self.body.len()));
        if self.body.is_empty() {
            self.die(severed.len());
        }
        severed
    }

    /// Kill the worm, returning the whole body
    pub fn kill(&mut self) -> Vec<Position> {
        let remains = std::mem::take(&mut self.body);
        self.die(remains.len());
        remains
    }

    fn die(&mut self, size: usize) {
        self.alive = false;
        self.size_at_death = size;
        self.zombie.clear();
        self.biting.clear();
    }

    /// Length counted by the score: live length, or the length at death
    pub fn scored_length(&self) -> usize {
        if self.alive {
            self.body.len()
        } else {
            self.size_at_death
        }
    }

    pub fn score(&self, config: &GameConfig) -> u32 {
        config.length_weight * self.scored_length() as u32 + config.life_weight * self.life_duration
    }

    /// Get the length of the worm
    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Why a worm died
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Worm left the grid
    Wall,
    /// Worm ran into its own body
    SelfCollision,
    /// Worm ran into another worm
    Worm(WormId),
    /// Worm ran into a stone
    Stone,
    /// Another worm's tongue landed on the head
    Bitten(WormId),
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub worms: Vec<Worm>,
    pub apples: Vec<Position>,
    /// Petrified cells, in creation order
    pub stones: Vec<Position>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub ruleset: Ruleset,
    pub steps: u32,
    /// Alive time not yet converted into life credit
    pub life_clock: Duration,
    pub game_over: bool,
    pub winner: Option<WormId>,
}

impl GameState {
    /// Create a new game state
    pub fn new(
        worms: Vec<Worm>,
        apples: Vec<Position>,
        grid_width: usize,
        grid_height: usize,
        ruleset: Ruleset,
    ) -> Self {
        Self {
            worms,
            apples,
            stones: Vec::new(),
            grid_width,
            grid_height,
            ruleset,
            steps: 0,
            life_clock: Duration::ZERO,
            game_over: false,
            winner: None,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    pub fn living_worms(&self) -> impl Iterator<Item = &Worm> {
        self.worms.iter().filter(|w| w.alive)
    }

    pub fn is_stone(&self, pos: Position) -> bool {
        self.stones.contains(&pos)
    }

    /// Check if a position is taken by a worm, a stone or an apple
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.worms.iter().any(|w| w.occupies(pos))
            || self.is_stone(pos)
            || self.apples.contains(&pos)
    }

    pub fn dead_count(&self) -> usize {
        self.worms.iter().filter(|w| !w.alive).count()
    }
}
