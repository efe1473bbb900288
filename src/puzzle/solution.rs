//! Solution representation for square tiling problems

use super::validator::ValidationResult;
use crate::sat::{ClauseStatistics, DecodeAnomaly};
use crate::tiling::Placement;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// A decoded tiling together with how it was obtained
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Tile index per cell, row-major
    pub placement: Placement,
    /// Oddities found while decoding the model
    pub anomalies: Vec<DecodeAnomaly>,
    /// Independent check of the placement against the tile table
    pub validation: ValidationResult,
    /// Time spent inside the SAT solver
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Identifier derived from the placement contents
    pub id: String,
    /// Name of the backend that produced the model
    pub backend: String,
    pub grid_size: usize,
    pub tile_count: usize,
    /// How often each tile index was placed
    pub tile_usage: Vec<usize>,
    pub distinct_tiles_used: usize,
    pub encoding: ClauseStatistics,
}

/// Compact view used in summaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub id: String,
    pub backend: String,
    pub grid_size: usize,
    pub is_valid: bool,
    pub anomalies: usize,
    pub total_clauses: usize,
    pub solve_time_ms: u64,
}

impl Solution {
    pub fn new(
        placement: Placement,
        anomalies: Vec<DecodeAnomaly>,
        validation: ValidationResult,
        solve_time: Duration,
        backend: &str,
        encoding: ClauseStatistics,
    ) -> Self {
        let metadata = SolutionMetadata::analyze(&placement, backend, encoding);

        Self {
            placement,
            anomalies,
            validation,
            solve_time,
            metadata,
        }
    }

    /// True when the model decoded cleanly and the placement passed validation
    pub fn is_proper(&self) -> bool {
        self.anomalies.is_empty() && self.validation.is_valid
    }

    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            id: self.metadata.id.clone(),
            backend: self.metadata.backend.clone(),
            grid_size: self.metadata.grid_size,
            is_valid: self.validation.is_valid,
            anomalies: self.anomalies.len(),
            total_clauses: self.metadata.encoding.total_clauses(),
            solve_time_ms: self.solve_time.as_millis() as u64,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json().context("Failed to serialize solution")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write solution: {}", path.display()))?;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read solution: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse solution: {}", path.display()))
    }
}

impl SolutionMetadata {
    pub fn analyze(placement: &Placement, backend: &str, encoding: ClauseStatistics) -> Self {
        let tile_usage = placement.tile_usage(encoding.tile_count);
        let distinct_tiles_used = tile_usage.iter().filter(|&&n| n > 0).count();

        Self {
            id: Self::generate_id(placement),
            backend: backend.to_string(),
            grid_size: placement.size,
            tile_count: encoding.tile_count,
            tile_usage,
            distinct_tiles_used,
            encoding,
        }
    }

    fn generate_id(placement: &Placement) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        placement.size.hash(&mut hasher);
        placement.cells.hash(&mut hasher);

        format!("tiling_{:x}", hasher.finish())
    }
}
