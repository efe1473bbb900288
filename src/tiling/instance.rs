//! Immutable tiling instance: grid size, declared colors and tile table

use super::Tile;
use crate::error::ConfigurationError;
use serde::Serialize;

/// A validated edge-matching instance.
///
/// Fields are private so that every `Instance` in circulation has a positive
/// grid size, at least one tile, and a variable count that fits a DIMACS
/// literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instance {
    grid_size: usize,
    color_count: u32,
    tiles: Vec<Tile>,
}

impl Instance {
    /// Create an instance, rejecting degenerate sizes
    pub fn new(grid_size: usize, color_count: u32, tiles: Vec<Tile>) -> Result<Self, ConfigurationError> {
        if grid_size == 0 {
            return Err(ConfigurationError::NonPositiveGridSize(0));
        }
        if color_count == 0 {
            return Err(ConfigurationError::NonPositiveColorCount(0));
        }
        if tiles.is_empty() {
            return Err(ConfigurationError::EmptyTileSet);
        }

        let too_large = || ConfigurationError::ProblemTooLarge {
            grid_size,
            tiles: tiles.len(),
        };
        let variables = grid_size
            .checked_mul(grid_size)
            .and_then(|cells| cells.checked_mul(tiles.len()))
            .ok_or_else(too_large)?;
        if variables > i32::MAX as usize {
            return Err(too_large());
        }

        Ok(Self {
            grid_size,
            color_count,
            tiles,
        })
    }

    /// Side length `k` of the square grid
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Color count from the instance header
    pub fn color_count(&self) -> u32 {
        self.color_count
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, index: usize) -> Option<&Tile> {
        self.tiles.get(index)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    /// Number of Boolean variables `k²·T`
    pub fn variable_count(&self) -> usize {
        self.cell_count() * self.tiles.len()
    }

    /// Tiles using a color id at or above the declared color count
    pub fn color_bound_violations(&self) -> Vec<(usize, u32)> {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(index, tile)| {
                let max = tile.max_color();
                (max >= self.color_count).then_some((index, max))
            })
            .collect()
    }

    /// Fail on the first tile whose colors exceed the declared count
    pub fn check_color_bound(&self) -> Result<(), ConfigurationError> {
        match self.color_bound_violations().first() {
            Some(&(tile, color)) => Err(ConfigurationError::ColorOutOfRange {
                tile,
                color,
                declared: self.color_count,
            }),
            None => Ok(()),
        }
    }
}
