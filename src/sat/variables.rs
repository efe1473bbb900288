//! Variable indexing for the tiling encoding
//!
//! Variable `x(i, j, t)` means "cell (i, j) holds tile t" and is numbered
//! `(i·k + j)·T + t + 1`: cells in row-major order, tiles within a cell.

use crate::tiling::Instance;

/// The (cell, tile) pair a variable stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellVariable {
    pub row: usize,
    pub col: usize,
    pub tile: usize,
}

/// Bijection between (row, col, tile) triples and variable ids `1..=k²·T`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableIndexer {
    grid_size: usize,
    tile_count: usize,
}

impl VariableIndexer {
    /// Create an indexer for a `grid_size`×`grid_size` grid with `tile_count` tiles
    pub fn new(grid_size: usize, tile_count: usize) -> Self {
        let count = grid_size
            .checked_mul(grid_size)
            .and_then(|cells| cells.checked_mul(tile_count));
        assert!(
            matches!(count, Some(n) if n <= i32::MAX as usize),
            "{}x{} grid with {} tiles exceeds the DIMACS variable range",
            grid_size,
            grid_size,
            tile_count
        );

        Self { grid_size, tile_count }
    }

    pub fn for_instance(instance: &Instance) -> Self {
        Self::new(instance.grid_size(), instance.tile_count())
    }

    /// Variable id for tile `tile` at cell (`row`, `col`)
    ///
    /// # Panics
    ///
    /// Panics if any argument is out of range.
    #[inline]
    pub fn index(&self, row: usize, col: usize, tile: usize) -> i32 {
        assert!(
            row < self.grid_size && col < self.grid_size && tile < self.tile_count,
            "variable ({}, {}, {}) out of range for {}x{} grid with {} tiles",
            row,
            col,
            tile,
            self.grid_size,
            self.grid_size,
            self.tile_count
        );
        ((row * self.grid_size + col) * self.tile_count + tile + 1) as i32
    }

    /// Inverse of [`index`](Self::index); `None` for ids outside `1..=k²·T`
    pub fn decode(&self, id: i32) -> Option<CellVariable> {
        if id < 1 || id as usize > self.variable_count() {
            return None;
        }

        let offset = id as usize - 1;
        let cell = offset / self.tile_count;
        Some(CellVariable {
            row: cell / self.grid_size,
            col: cell % self.grid_size,
            tile: offset % self.tile_count,
        })
    }

    /// The T variable ids of one cell, in tile order
    pub fn cell_variables(&self, row: usize, col: usize) -> Vec<i32> {
        (0..self.tile_count).map(|t| self.index(row, col, t)).collect()
    }

    /// Total number of variables `k²·T`
    pub fn variable_count(&self) -> usize {
        self.grid_size * self.grid_size * self.tile_count
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }
}
