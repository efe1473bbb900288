//! Square tiling problem definition

use super::{PlacementValidator, Solution};
use crate::config::Settings;
use crate::sat::encoder::ComplexityEstimate;
use crate::sat::{ClauseStatistics, Cnf, CompatibilityTable, EncodedSolve, SatBackend, TilingEncoder};
use crate::tiling::{load_instance_from_file, Instance};
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Final answer for one instance
#[derive(Debug, Clone)]
pub enum TilingOutcome {
    Solved(Solution),
    /// No proper tiling exists
    Unsatisfiable,
    /// The solver claimed satisfiability without producing a model
    MissingModel,
}

/// A loaded instance plus the settings used to encode and solve it
pub struct TilingProblem {
    settings: Settings,
    instance: Instance,
    compatibility: CompatibilityTable,
}

impl TilingProblem {
    /// Load the instance named in the settings
    pub fn new(settings: Settings) -> Result<Self> {
        let instance = load_instance_from_file(&settings.input.instance_file)
            .context("Failed to load instance file")?;

        Self::with_instance(settings, instance)
    }

    /// Create a problem with an explicit instance (useful for testing)
    pub fn with_instance(settings: Settings, instance: Instance) -> Result<Self> {
        if settings.encoding.enforce_color_bound {
            instance.check_color_bound()?;
        } else {
            for (tile, color) in instance.color_bound_violations() {
                warn!(
                    tile,
                    color,
                    declared = instance.color_count(),
                    "tile uses a color outside the declared range"
                );
            }
        }

        let compatibility = CompatibilityTable::build(instance.tiles());
        Ok(Self {
            settings,
            instance,
            compatibility,
        })
    }

    fn encoder(&self) -> TilingEncoder<'_> {
        TilingEncoder::with_compatibility(&self.instance, &self.compatibility, &self.settings.encoding)
    }

    /// Encode, solve with `backend`, decode and validate
    pub fn solve<B: SatBackend + ?Sized>(&self, backend: &mut B) -> Result<TilingOutcome> {
        info!(
            grid_size = self.instance.grid_size(),
            tiles = self.instance.tile_count(),
            colors = self.instance.color_count(),
            "solving square tiling instance"
        );

        let encoder = self.encoder();
        let outcome = match encoder.solve(backend)? {
            EncodedSolve::Unsatisfiable => TilingOutcome::Unsatisfiable,
            EncodedSolve::EmptyModel => TilingOutcome::MissingModel,
            EncodedSolve::Decoded { decoded, solve_time } => {
                let validation = PlacementValidator::new(&self.instance).validate(&decoded.placement);
                if !validation.is_valid {
                    warn!(violations = validation.violations.len(), "decoded placement is not a proper tiling");
                }

                TilingOutcome::Solved(Solution::new(
                    decoded.placement,
                    decoded.anomalies,
                    validation,
                    solve_time,
                    backend.name(),
                    encoder.statistics(),
                ))
            }
        };

        Ok(outcome)
    }

    /// Generate the formula and write it to the configured CNF path
    pub fn write_cnf(&self) -> Result<Cnf> {
        let cnf = self.encoder().encode();
        cnf.save_to_file(&self.settings.output.cnf_file)?;
        info!(path = %self.settings.output.cnf_file.display(), "wrote DIMACS formula");
        Ok(cnf)
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Tile conflict table shared by every encoding of this instance
    pub fn compatibility(&self) -> &CompatibilityTable {
        &self.compatibility
    }

    /// Predicted clause counts, without generating any clause
    pub fn encoding_statistics(&self) -> ClauseStatistics {
        self.encoder().statistics()
    }

    pub fn estimate_complexity(&self) -> ComplexityEstimate {
        self.encoder().estimate_complexity()
    }
}
