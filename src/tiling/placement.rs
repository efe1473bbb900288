//! Decoded tile placements

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value rendered for a cell that holds no tile
pub const UNASSIGNED: i64 = -1;

/// A k×k grid of tile indices, `None` where no tile was assigned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub size: usize,
    pub cells: Vec<Option<usize>>,
}

impl Placement {
    /// Create a placement with every cell unassigned
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![None; size * size],
        }
    }

    /// Create a placement from rows of tile indices
    pub fn from_rows(rows: Vec<Vec<Option<usize>>>) -> Result<Self> {
        if rows.is_empty() {
            anyhow::bail!("Placement cannot be empty");
        }

        let size = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                anyhow::bail!("Row {} has length {}, expected {} (placements are square)", i, row.len(), size);
            }
        }

        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Tile at the given cell, `None` when unassigned or out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.size && col < self.size {
            self.cells[self.index(row, col)]
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, tile: Option<usize>) -> Result<()> {
        if row >= self.size || col >= self.size {
            anyhow::bail!("Coordinates ({}, {}) out of bounds for {}x{} placement", row, col, self.size, self.size);
        }
        let idx = self.index(row, col);
        self.cells[idx] = tile;
        Ok(())
    }

    /// Rows of rendered values, with [`UNASSIGNED`] for empty cells
    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.cells
            .chunks(self.size.max(1))
            .map(|row| row.iter().map(|cell| cell.map_or(UNASSIGNED, |t| t as i64)).collect())
            .collect()
    }

    pub fn unassigned_cells(&self) -> Vec<(usize, usize)> {
        let mut unassigned = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.get(row, col).is_none() {
                    unassigned.push((row, col));
                }
            }
        }
        unassigned
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// How often each tile index is used
    pub fn tile_usage(&self, tile_count: usize) -> Vec<usize> {
        let mut usage = vec![0; tile_count];
        for tile in self.cells.iter().flatten() {
            if let Some(count) = usage.get_mut(*tile) {
                *count += 1;
            }
        }
        usage
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
