pub mod cell_graph;
pub mod config;
pub mod direction;
pub mod display_grid;
pub mod error;
pub mod game;
pub mod generator;
pub mod movement;

pub use cell_graph::{CellGraph, Pos, VisitedSet};
pub use config::GameConfig;
pub use direction::{Dir, OpenDirs};
pub use display_grid::{DisplayGrid, Tile};
pub use error::{MazeError, MazeResult};
pub use game::{Game, HeldKeys, Input, Phase, TickOutcome};
pub use generator::{generate, Generator, StepResult};
