//! Decoding solver models back into tile placements

use super::VariableIndexer;
use crate::error::DecodeError;
use crate::tiling::{Instance, Placement};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Something unexpected found while decoding a model
///
/// Anomalies never abort decoding; the affected cell is decoded best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeAnomaly {
    /// No tile variable of the cell is true
    UnassignedCell { row: usize, col: usize },
    /// More than one tile variable of the cell is true; the lowest index is kept
    MultipleTiles { row: usize, col: usize, tiles: Vec<usize> },
    /// Literal whose variable does not exist in this encoding
    LiteralOutOfRange { literal: i32 },
}

impl fmt::Display for DecodeAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeAnomaly::UnassignedCell { row, col } => {
                write!(f, "cell ({}, {}) has no tile in the model", row, col)
            }
            DecodeAnomaly::MultipleTiles { row, col, tiles } => {
                write!(f, "cell ({}, {}) has several tiles {:?}, keeping {}", row, col, tiles, tiles[0])
            }
            DecodeAnomaly::LiteralOutOfRange { literal } => {
                write!(f, "literal {} refers to an unknown variable", literal)
            }
        }
    }
}

/// A placement together with everything odd about the model it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedModel {
    pub placement: Placement,
    pub anomalies: Vec<DecodeAnomaly>,
}

impl DecodedModel {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Maps signed literals onto a k×k grid of tile indices
#[derive(Debug, Clone, Copy)]
pub struct ModelDecoder {
    indexer: VariableIndexer,
}

impl ModelDecoder {
    pub fn new(indexer: VariableIndexer) -> Self {
        Self { indexer }
    }

    pub fn for_instance(instance: &Instance) -> Self {
        Self::new(VariableIndexer::for_instance(instance))
    }

    /// Decode a model; absent variables count as false
    ///
    /// For each cell the lowest tile index whose variable is true wins. An
    /// empty model is an error because it cannot be told apart from a solver
    /// that never produced one.
    pub fn decode(&self, model: &[i32]) -> Result<DecodedModel, DecodeError> {
        if model.iter().all(|&literal| literal == 0) {
            return Err(DecodeError::EmptyModel);
        }

        let variable_count = self.indexer.variable_count();
        let mut truth = vec![false; variable_count + 1];
        let mut anomalies = Vec::new();

        for &literal in model.iter().filter(|&&literal| literal != 0) {
            let var = literal.unsigned_abs() as usize;
            if var > variable_count {
                anomalies.push(DecodeAnomaly::LiteralOutOfRange { literal });
                continue;
            }
            if literal > 0 {
                truth[var] = true;
            }
        }

        let k = self.indexer.grid_size();
        let mut placement = Placement::new(k);

        for row in 0..k {
            for col in 0..k {
                let tiles: Vec<usize> = (0..self.indexer.tile_count())
                    .filter(|&t| truth[self.indexer.index(row, col, t) as usize])
                    .collect();

                match tiles.as_slice() {
                    [] => anomalies.push(DecodeAnomaly::UnassignedCell { row, col }),
                    [tile] => placement.cells[row * k + col] = Some(*tile),
                    [first, ..] => {
                        placement.cells[row * k + col] = Some(*first);
                        anomalies.push(DecodeAnomaly::MultipleTiles { row, col, tiles: tiles.clone() });
                    }
                }
            }
        }

        for anomaly in &anomalies {
            warn!(%anomaly, "anomalous model");
        }

        Ok(DecodedModel { placement, anomalies })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Model with tile `tiles[cell]` true in each cell and every other variable false
    fn model_for(indexer: &VariableIndexer, tiles: &[usize]) -> Vec<i32> {
        let k = indexer.grid_size();
        let mut model = Vec::new();
        for (cell, &chosen) in tiles.iter().enumerate() {
            for t in 0..indexer.tile_count() {
                let id = indexer.index(cell / k, cell % k, t);
                model.push(if t == chosen { id } else { -id });
            }
        }
        model
    }

    #[test]
    fn test_single_tile_round_trip() {
        for k in 1..=4 {
            let indexer = VariableIndexer::new(k, 1);
            let model: Vec<i32> = (1..=(k * k) as i32).collect();

            let decoded = ModelDecoder::new(indexer).decode(&model).unwrap();
            assert!(decoded.is_clean());
            assert!(decoded.placement.cells.iter().all(|&c| c == Some(0)));
        }
    }

    #[test]
    fn test_decode_full_model() {
        let indexer = VariableIndexer::new(2, 3);
        let model = model_for(&indexer, &[2, 0, 1, 1]);

        let decoded = ModelDecoder::new(indexer).decode(&model).unwrap();
        assert!(decoded.is_clean());
        assert_eq!(decoded.placement.to_string(), "2 0\n1 1\n");
    }

    #[test]
    fn test_partial_unordered_model() {
        let indexer = VariableIndexer::new(2, 2);
        // only the positive literals, shuffled and duplicated
        let model = vec![8, 1, 3, 5, 1];

        let decoded = ModelDecoder::new(indexer).decode(&model).unwrap();
        assert!(decoded.is_clean());
        assert_eq!(decoded.placement.to_string(), "0 0\n0 1\n");
    }

    #[test]
    fn test_unassigned_cell_is_isolated() {
        let indexer = VariableIndexer::new(2, 2);
        let mut model = model_for(&indexer, &[0, 1, 0, 1]);
        // drop the true literal of cell (1, 0)
        model.retain(|&lit| lit != indexer.index(1, 0, 0));

        let decoded = ModelDecoder::new(indexer).decode(&model).unwrap();
        assert_eq!(decoded.anomalies, vec![DecodeAnomaly::UnassignedCell { row: 1, col: 0 }]);
        assert_eq!(decoded.placement.to_string(), "0 1\n-1 1\n");
    }

    #[test]
    fn test_multiple_tiles_keeps_lowest() {
        let indexer = VariableIndexer::new(1, 3);
        let decoded = ModelDecoder::new(indexer).decode(&[3, 2, -1]).unwrap();

        assert_eq!(decoded.placement.get(0, 0), Some(1));
        assert_eq!(
            decoded.anomalies,
            vec![DecodeAnomaly::MultipleTiles { row: 0, col: 0, tiles: vec![1, 2] }]
        );
    }

    #[test]
    fn test_out_of_range_literal() {
        let indexer = VariableIndexer::new(1, 1);
        let decoded = ModelDecoder::new(indexer).decode(&[1, -7]).unwrap();

        assert_eq!(decoded.placement.get(0, 0), Some(0));
        assert_eq!(decoded.anomalies, vec![DecodeAnomaly::LiteralOutOfRange { literal: -7 }]);
    }

    #[test]
    fn test_empty_model_is_distinct() {
        let decoder = ModelDecoder::new(VariableIndexer::new(2, 2));
        assert_eq!(decoder.decode(&[]), Err(DecodeError::EmptyModel));
        assert_eq!(decoder.decode(&[0]), Err(DecodeError::EmptyModel));
    }
}
