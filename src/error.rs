//! Error types for instance loading and model decoding

use thiserror::Error;

/// A malformed or unusable tiling instance.
///
/// Every variant is raised before any clause is generated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("instance input is empty")]
    EmptyInput,

    #[error("missing grid size on line 1")]
    MissingGridSize,

    #[error("missing number of colors on line 2")]
    MissingColorCount,

    #[error("missing number of tiles on line 3")]
    MissingTileCount,

    #[error("line {line}: expected an integer, found '{value}'")]
    InvalidInteger { line: usize, value: String },

    #[error("grid size must be positive, got {0}")]
    NonPositiveGridSize(i64),

    #[error("number of colors must be positive, got {0}")]
    NonPositiveColorCount(i64),

    #[error("declared tile count must not be negative, got {0}")]
    NegativeTileCount(i64),

    #[error("tile set is empty; at least one tile is required")]
    EmptyTileSet,

    #[error("line {line}: each tile must have exactly 4 colors, found {found}")]
    TileArity { line: usize, found: usize },

    #[error("line {line}: color ids must be non-negative, got {value}")]
    NegativeColor { line: usize, value: i64 },

    #[error("expected {expected} tiles, got {found}")]
    TileCountMismatch { expected: usize, found: usize },

    #[error("tile {tile} uses color {color}, but only {declared} colors are declared")]
    ColorOutOfRange { tile: usize, color: u32, declared: u32 },

    #[error("{grid_size}x{grid_size} grid with {tiles} tiles needs more than {} variables", i32::MAX)]
    ProblemTooLarge { grid_size: usize, tiles: usize },
}

/// A model that cannot be decoded at all.
///
/// Per-cell problems are not errors; they are reported as
/// [`DecodeAnomaly`](crate::sat::decoder::DecodeAnomaly) values instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("solver reported a satisfiable result but returned no model")]
    EmptyModel,
}
