use thiserror::Error;

use crate::direction::Dir;

/// Errors produced by the maze core and its terminal host.
#[derive(Error, Debug)]
pub enum MazeError {
    /// Construction parameters cannot produce a maze.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A cell index outside the maze was used.
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} maze")]
    InvalidCoordinate {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A passage was requested through the outer wall.
    #[error("cell ({x}, {y}) has no neighbor to the {dir:?}")]
    NoNeighbor { x: usize, y: usize, dir: Dir },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type MazeResult<T> = Result<T, MazeError>;
