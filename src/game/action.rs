/// Direction a worm can face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Identifier of a worm in the session roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WormId(pub usize);

impl WormId {
    pub fn index(self) -> usize {
        self.0
    }

    /// One-based number shown to players
    pub fn number(self) -> usize {
        self.0 + 1
    }
}

/// Discrete command addressed to a single worm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Face a new direction (reversals are ignored)
    Turn(Direction),
    /// Enter zombie mode and strike with the tongue
    Bite,
    /// End the session immediately
    Quit,
}

impl From<Direction> for Command {
    fn from(direction: Direction) -> Self {
        Command::Turn(direction)
    }
}

/// What the driver has to do after a command was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command changed the worm's direction or abilities
    Applied,
    /// The command was rejected (reversal, dead worm, bite outside battle)
    Ignored,
    /// Quit was requested
    Quit,
}
