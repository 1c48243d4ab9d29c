//! Error types for Project Warden.

use thiserror::Error;

/// Top-level error type for Warden operations.
#[derive(Debug, Error)]
pub enum WardenError {
    /// Obstacle map errors
    #[error("Obstacle map error: {0}")]
    Obstacles(#[from] ObstacleError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building an obstacle map.
#[derive(Debug, Error)]
pub enum ObstacleError {
    /// Obstacle rectangle is degenerate or non-finite
    #[error("Invalid obstacle at ({x}, {y}) with size {width}x{height}")]
    InvalidObstacle {
        /// X coordinate
        x: f32,
        /// Y coordinate
        y: f32,
        /// Width
        width: f32,
        /// Height
        height: f32,
    },

    /// Tile size must be positive
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(f32),

    /// Unrecognized cell in a tile grid
    #[error("Unrecognized tile {value:?} at row {row}, column {column}")]
    UnknownTile {
        /// Row index
        row: usize,
        /// Column index
        column: usize,
        /// Cell text
        value: String,
    },
}

/// Result type alias for Warden operations.
pub type WardenResult<T> = Result<T, WardenError>;
