use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cell_graph::Pos;
use crate::error::{MazeError, MazeResult};

pub const MAZE_WIDTH: usize = 20;
pub const MAZE_HEIGHT: usize = 20;
pub const DEFAULT_STEPS_PER_TICK: usize = 1;
/// Largest width or height, in cells. Keeps the tile grid addressable by a
/// terminal's u16 coordinates.
pub const MAX_MAZE_SIDE: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub width: usize,
    pub height: usize,
    /// Cell where carving starts and the player spawns.
    pub start: Pos,
    pub goal: Pos,
    /// Generator steps per tick. Only affects pacing.
    pub steps_per_tick: usize,
    /// Carve the whole maze on the first tick instead of animating it.
    pub instant: bool,
    pub seed: Option<u64>,
}

impl GameConfig {
    /// Start in the bottom-right corner, goal in the top-left.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            start: Pos::new(width.saturating_sub(1), height.saturating_sub(1)),
            goal: Pos::new(0, 0),
            steps_per_tick: DEFAULT_STEPS_PER_TICK,
            instant: false,
            seed: None,
        }
    }

    pub fn validate(&self) -> MazeResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(MazeError::InvalidConfiguration(format!(
                "maze dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > MAX_MAZE_SIDE || self.height > MAX_MAZE_SIDE {
            return Err(MazeError::InvalidConfiguration(format!(
                "maze dimensions are limited to {}x{}, got {}x{}",
                MAX_MAZE_SIDE, MAX_MAZE_SIDE, self.width, self.height
            )));
        }
        if self.steps_per_tick == 0 {
            return Err(MazeError::InvalidConfiguration(
                "steps per tick must be at least 1".to_string(),
            ));
        }
        for (name, pos) in [("start", self.start), ("goal", self.goal)] {
            if pos.x >= self.width || pos.y >= self.height {
                return Err(MazeError::InvalidConfiguration(format!(
                    "{} cell ({}, {}) is outside the {}x{} maze",
                    name, pos.x, pos.y, self.width, self.height
                )));
            }
        }
        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::with_size(MAZE_WIDTH, MAZE_HEIGHT)
    }
}
