//! Independent re-check of decoded placements

use crate::tiling::{Instance, Placement, Tile};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Checks a placement against the tile table without going through the encoding
pub struct PlacementValidator<'a> {
    instance: &'a Instance,
}

/// A single reason a placement is not a proper tiling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementViolation {
    SizeMismatch { expected: usize, found: usize },
    UnassignedCell { row: usize, col: usize },
    UnknownTile { row: usize, col: usize, tile: usize },
    /// Right edge of (row, col) differs from the left edge of (row, col + 1)
    HorizontalMismatch { row: usize, col: usize, right: u32, left: u32 },
    /// Bottom edge of (row, col) differs from the top edge of (row + 1, col)
    VerticalMismatch { row: usize, col: usize, bottom: u32, top: u32 },
}

impl fmt::Display for PlacementViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementViolation::SizeMismatch { expected, found } => {
                write!(f, "placement is {}x{}, instance grid is {}x{}", found, found, expected, expected)
            }
            PlacementViolation::UnassignedCell { row, col } => {
                write!(f, "cell ({}, {}) has no tile", row, col)
            }
            PlacementViolation::UnknownTile { row, col, tile } => {
                write!(f, "cell ({}, {}) uses unknown tile {}", row, col, tile)
            }
            PlacementViolation::HorizontalMismatch { row, col, right, left } => write!(
                f,
                "cells ({}, {}) and ({}, {}) disagree: right color {} vs left color {}",
                row, col, row, col + 1, right, left
            ),
            PlacementViolation::VerticalMismatch { row, col, bottom, top } => write!(
                f,
                "cells ({}, {}) and ({}, {}) disagree: bottom color {} vs top color {}",
                row, col, row + 1, col, bottom, top
            ),
        }
    }
}

/// Result of placement validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<PlacementViolation>,
    pub error_message: Option<String>,
    pub cells_checked: usize,
    pub edges_checked: usize,
    pub validation_time_ms: u64,
}

impl<'a> PlacementValidator<'a> {
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// Validate that `placement` is a proper tiling of the instance grid
    ///
    /// Edges touching an unassigned or unknown cell are skipped; the cell
    /// itself is already reported.
    pub fn validate(&self, placement: &Placement) -> ValidationResult {
        let start_time = Instant::now();
        let k = self.instance.grid_size();

        if placement.size != k {
            let violations = vec![PlacementViolation::SizeMismatch {
                expected: k,
                found: placement.size,
            }];
            return ValidationResult {
                is_valid: false,
                error_message: Some(Self::generate_error_message(&violations)),
                violations,
                cells_checked: 0,
                edges_checked: 0,
                validation_time_ms: start_time.elapsed().as_millis() as u64,
            };
        }

        let mut violations = self.check_cells(placement);
        let mut edges_checked = 0;

        for row in 0..k {
            for col in 0..k {
                let Some(tile) = self.tile_at(placement, row, col) else {
                    continue;
                };

                if col + 1 < k {
                    if let Some(right) = self.tile_at(placement, row, col + 1) {
                        edges_checked += 1;
                        if !tile.fits_left_of(right) {
                            violations.push(PlacementViolation::HorizontalMismatch {
                                row,
                                col,
                                right: tile.right,
                                left: right.left,
                            });
                        }
                    }
                }

                if row + 1 < k {
                    if let Some(below) = self.tile_at(placement, row + 1, col) {
                        edges_checked += 1;
                        if !tile.fits_above(below) {
                            violations.push(PlacementViolation::VerticalMismatch {
                                row,
                                col,
                                bottom: tile.bottom,
                                top: below.top,
                            });
                        }
                    }
                }
            }
        }

        let is_valid = violations.is_empty();
        let error_message = if is_valid {
            None
        } else {
            Some(Self::generate_error_message(&violations))
        };

        ValidationResult {
            is_valid,
            violations,
            error_message,
            cells_checked: k * k,
            edges_checked,
            validation_time_ms: start_time.elapsed().as_millis() as u64,
        }
    }

    fn check_cells(&self, placement: &Placement) -> Vec<PlacementViolation> {
        let k = placement.size;
        let mut violations = Vec::new();

        for row in 0..k {
            for col in 0..k {
                match placement.get(row, col) {
                    None => violations.push(PlacementViolation::UnassignedCell { row, col }),
                    Some(tile) if tile >= self.instance.tile_count() => {
                        violations.push(PlacementViolation::UnknownTile { row, col, tile })
                    }
                    Some(_) => {}
                }
            }
        }

        violations
    }

    fn tile_at(&self, placement: &Placement, row: usize, col: usize) -> Option<&'a Tile> {
        placement.get(row, col).and_then(|t| self.instance.tile(t))
    }

    /// Generate a descriptive error message from a list of violations
    fn generate_error_message(violations: &[PlacementViolation]) -> String {
        let mut message = format!("Found {} violations. ", violations.len());

        for (i, violation) in violations.iter().take(3).enumerate() {
            if i == 0 {
                message.push_str("Examples: ");
            }
            message.push_str(&format!("{}; ", violation));
        }

        if violations.len() > 3 {
            message.push_str(&format!("... and {} more", violations.len() - 3));
        }

        message
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation Result: {}", if self.is_valid { "VALID" } else { "INVALID" })?;

        if let Some(ref error) = self.error_message {
            writeln!(f, "Error: {}", error)?;
        }

        writeln!(f, "Cells checked: {}", self.cells_checked)?;
        writeln!(f, "Edges checked: {}", self.edges_checked)?;
        writeln!(f, "Violations: {}", self.violations.len())?;
        writeln!(f, "Validation time: {}ms", self.validation_time_ms)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checkerboard() -> Instance {
        Instance::new(2, 2, vec![Tile::new(0, 1, 1, 0), Tile::new(1, 0, 0, 1)]).unwrap()
    }

    #[test]
    fn test_valid_checkerboard() {
        let instance = checkerboard();
        let placement = Placement::from_rows(vec![vec![Some(0), Some(1)], vec![Some(1), Some(0)]]).unwrap();

        let result = PlacementValidator::new(&instance).validate(&placement);
        assert!(result.is_valid);
        assert!(result.error_message.is_none());
        assert_eq!(result.cells_checked, 4);
        assert_eq!(result.edges_checked, 4);
    }

    #[test]
    fn test_edge_mismatches() {
        let instance = checkerboard();
        let placement = Placement::from_rows(vec![vec![Some(0), Some(0)], vec![Some(1), Some(0)]]).unwrap();

        let result = PlacementValidator::new(&instance).validate(&placement);
        assert!(!result.is_valid);
        assert!(result.violations.contains(&PlacementViolation::HorizontalMismatch {
            row: 0,
            col: 0,
            right: 1,
            left: 0,
        }));
        assert!(result.violations.contains(&PlacementViolation::VerticalMismatch {
            row: 0,
            col: 1,
            bottom: 1,
            top: 0,
        }));
    }

    #[test]
    fn test_unassigned_and_unknown_cells() {
        let instance = checkerboard();
        let placement = Placement::from_rows(vec![vec![Some(0), None], vec![Some(7), Some(0)]]).unwrap();

        let result = PlacementValidator::new(&instance).validate(&placement);
        assert!(!result.is_valid);
        assert_eq!(
            &result.violations[..2],
            &[
                PlacementViolation::UnassignedCell { row: 0, col: 1 },
                PlacementViolation::UnknownTile { row: 1, col: 0, tile: 7 },
            ]
        );
        // every edge touches a bad cell
        assert_eq!(result.edges_checked, 0);
    }

    #[test]
    fn test_size_mismatch() {
        let instance = checkerboard();
        let placement = Placement::new(3);

        let result = PlacementValidator::new(&instance).validate(&placement);
        assert!(!result.is_valid);
        assert_eq!(result.violations, vec![PlacementViolation::SizeMismatch { expected: 2, found: 3 }]);
        assert!(result.to_string().contains("INVALID"));
    }
}
