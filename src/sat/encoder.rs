//! SAT encoder for square tiling instances

use super::compatibility::CompatibilityTable;
use super::constraints::{ClauseGenerator, ClauseStatistics};
use super::decoder::{DecodedModel, ModelDecoder};
use super::dimacs::Cnf;
use super::solver::{SatBackend, SolveResult};
use crate::config::EncodingConfig;
use crate::error::DecodeError;
use crate::tiling::Instance;
use anyhow::{Context, Result};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// What a single encode-solve-decode pass produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedSolve {
    Decoded { decoded: DecodedModel, solve_time: Duration },
    Unsatisfiable,
    /// The solver claimed satisfiability but returned no literals
    EmptyModel,
}

/// Main SAT encoder for tiling instances
pub struct TilingEncoder<'a> {
    instance: &'a Instance,
    generator: ClauseGenerator<'a>,
    decoder: ModelDecoder,
}

impl<'a> TilingEncoder<'a> {
    /// Create an encoder for `instance`
    pub fn new(instance: &'a Instance, encoding: &EncodingConfig) -> Self {
        Self {
            instance,
            generator: ClauseGenerator::new(instance).with_parallelism(encoding.parallel),
            decoder: ModelDecoder::for_instance(instance),
        }
    }

    /// Create an encoder that reuses a conflict table built for `instance`
    pub fn with_compatibility(
        instance: &'a Instance,
        compatibility: &'a CompatibilityTable,
        encoding: &EncodingConfig,
    ) -> Self {
        Self {
            instance,
            generator: ClauseGenerator::with_compatibility(instance, compatibility)
                .with_parallelism(encoding.parallel),
            decoder: ModelDecoder::for_instance(instance),
        }
    }

    /// Generate the complete formula
    pub fn encode(&self) -> Cnf {
        self.generator.generate_all_constraints()
    }

    /// Encode, hand the formula to `backend` and decode its answer
    pub fn solve<B: SatBackend + ?Sized>(&self, backend: &mut B) -> Result<EncodedSolve> {
        let cnf = self.encode();
        info!(
            variables = cnf.num_variables,
            clauses = cnf.num_clauses(),
            backend = backend.name(),
            "solving tiling formula"
        );

        let result = backend
            .solve(&cnf)
            .with_context(|| format!("SAT solving failed with backend '{}'", backend.name()))?;

        match result {
            SolveResult::Unsatisfiable => Ok(EncodedSolve::Unsatisfiable),
            SolveResult::Satisfiable(solution) => match self.decoder.decode(&solution.model) {
                Ok(decoded) => Ok(EncodedSolve::Decoded {
                    decoded,
                    solve_time: solution.solve_time,
                }),
                Err(DecodeError::EmptyModel) => {
                    warn!("solver reported SAT without a model");
                    Ok(EncodedSolve::EmptyModel)
                }
            },
        }
    }

    /// Decode a model obtained elsewhere
    pub fn decode(&self, model: &[i32]) -> Result<DecodedModel, DecodeError> {
        self.decoder.decode(model)
    }

    /// Clause counts per family
    pub fn statistics(&self) -> ClauseStatistics {
        self.generator.statistics()
    }

    pub fn generator(&self) -> &ClauseGenerator<'a> {
        &self.generator
    }

    /// Rough size classification, computed without generating clauses
    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        let stats = self.statistics();
        let total_clauses = stats.total_clauses();

        let complexity_level = if total_clauses < 10_000 {
            ComplexityLevel::Low
        } else if total_clauses < 1_000_000 {
            ComplexityLevel::Medium
        } else if total_clauses < 50_000_000 {
            ComplexityLevel::High
        } else {
            ComplexityLevel::VeryHigh
        };

        let tile_count = self.instance.tile_count();
        let compatibility = self.generator.compatibility();

        ComplexityEstimate {
            complexity_level,
            estimated_variables: stats.variables,
            estimated_clauses: total_clauses,
            uniqueness_share: stats.uniqueness as f64 / total_clauses.max(1) as f64,
            horizontal_compatible_pairs: compatibility.horizontal_compatible(tile_count),
            vertical_compatible_pairs: compatibility.vertical_compatible(tile_count),
        }
    }
}

/// Complexity estimate for an instance
#[derive(Debug, Clone)]
pub struct ComplexityEstimate {
    pub complexity_level: ComplexityLevel,
    pub estimated_variables: usize,
    pub estimated_clauses: usize,
    /// Fraction of clauses spent on "at most one tile per cell"
    pub uniqueness_share: f64,
    pub horizontal_compatible_pairs: usize,
    pub vertical_compatible_pairs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl fmt::Display for ComplexityEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Problem Complexity Estimate:")?;
        writeln!(f, "  Complexity level: {:?}", self.complexity_level)?;
        writeln!(f, "  Estimated variables: {}", self.estimated_variables)?;
        writeln!(f, "  Estimated clauses: {}", self.estimated_clauses)?;
        writeln!(f, "  Uniqueness share: {:.1}%", self.uniqueness_share * 100.0)?;
        writeln!(f, "  Compatible pairs (horizontal): {}", self.horizontal_compatible_pairs)?;
        writeln!(f, "  Compatible pairs (vertical): {}", self.vertical_compatible_pairs)?;

        let recommendation = if self.horizontal_compatible_pairs == 0 || self.vertical_compatible_pairs == 0 {
            "No tile pair can touch in one direction; only a 1x1 grid can be tiled"
        } else {
            match self.complexity_level {
                ComplexityLevel::Low => "Should solve quickly",
                ComplexityLevel::Medium => "May take some time to solve",
                ComplexityLevel::High => "Large formula, consider an external solver",
                ComplexityLevel::VeryHigh => "Very large formula, consider removing duplicate tiles",
            }
        };
        writeln!(f, "  Recommendation: {}", recommendation)?;

        Ok(())
    }
}
