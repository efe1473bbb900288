//! Clause generation for the square tiling encoding

use super::compatibility::CompatibilityTable;
use super::dimacs::Cnf;
use super::VariableIndexer;
use crate::tiling::Instance;
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    pub literals: Vec<i32>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<i32>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: i32) -> Self {
        Self { literals: vec![literal] }
    }

    /// Create a binary clause (two literals)
    pub fn binary(lit1: i32, lit2: i32) -> Self {
        Self { literals: vec![lit1, lit2] }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Check if clause is unit
    pub fn is_unit(&self) -> bool {
        self.literals.len() == 1
    }
}

/// Generates the CNF for one tiling instance
///
/// Clause families are emitted in a fixed order (coverage, uniqueness,
/// horizontal, vertical) with cells in row-major order, so two runs over the
/// same instance produce identical formulas.
pub struct ClauseGenerator<'a> {
    instance: &'a Instance,
    indexer: VariableIndexer,
    compatibility: Cow<'a, CompatibilityTable>,
    parallel: bool,
}

impl<'a> ClauseGenerator<'a> {
    /// Create a generator and precompute the tile conflict table
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            indexer: VariableIndexer::for_instance(instance),
            compatibility: Cow::Owned(CompatibilityTable::build(instance.tiles())),
            parallel: false,
        }
    }

    /// Create a generator over a conflict table that was already built for `instance`
    pub fn with_compatibility(instance: &'a Instance, compatibility: &'a CompatibilityTable) -> Self {
        Self {
            instance,
            indexer: VariableIndexer::for_instance(instance),
            compatibility: Cow::Borrowed(compatibility),
            parallel: false,
        }
    }

    /// Generate uniqueness clauses on the rayon pool
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Generate every clause family
    pub fn generate_all_constraints(&self) -> Cnf {
        let mut clauses = self.generate_coverage_constraints();
        clauses.extend(self.generate_uniqueness_constraints());
        clauses.extend(self.generate_horizontal_constraints());
        clauses.extend(self.generate_vertical_constraints());

        debug!(
            variables = self.indexer.variable_count(),
            clauses = clauses.len(),
            parallel = self.parallel,
            "generated tiling constraints"
        );

        Cnf::new(self.indexer.variable_count(), clauses)
    }

    /// At least one tile per cell
    pub fn generate_coverage_constraints(&self) -> Vec<Clause> {
        let k = self.instance.grid_size();
        let mut clauses = Vec::with_capacity(k * k);

        for i in 0..k {
            for j in 0..k {
                clauses.push(Clause::new(self.indexer.cell_variables(i, j)));
            }
        }

        clauses
    }

    /// At most one tile per cell
    pub fn generate_uniqueness_constraints(&self) -> Vec<Clause> {
        let k = self.instance.grid_size();

        if self.parallel {
            (0..k * k)
                .into_par_iter()
                .flat_map_iter(|cell| self.cell_uniqueness_constraints(cell / k, cell % k))
                .collect()
        } else {
            (0..k * k)
                .flat_map(|cell| self.cell_uniqueness_constraints(cell / k, cell % k))
                .collect()
        }
    }

    fn cell_uniqueness_constraints(&self, i: usize, j: usize) -> Vec<Clause> {
        (0..self.instance.tile_count())
            .tuple_combinations::<(usize, usize)>()
            .map(|(t1, t2)| Clause::binary(-self.indexer.index(i, j, t1), -self.indexer.index(i, j, t2)))
            .collect()
    }

    /// Forbid clashing colors between (i, j) and (i, j + 1)
    pub fn generate_horizontal_constraints(&self) -> Vec<Clause> {
        let k = self.instance.grid_size();
        let conflicts = &self.compatibility.horizontal_conflicts;
        let mut clauses = Vec::with_capacity(k * k.saturating_sub(1) * conflicts.len());

        for i in 0..k {
            for j in 0..k.saturating_sub(1) {
                for &(left, right) in conflicts {
                    clauses.push(Clause::binary(
                        -self.indexer.index(i, j, left),
                        -self.indexer.index(i, j + 1, right),
                    ));
                }
            }
        }

        clauses
    }

    /// Forbid clashing colors between (i, j) and (i + 1, j)
    pub fn generate_vertical_constraints(&self) -> Vec<Clause> {
        let k = self.instance.grid_size();
        let conflicts = &self.compatibility.vertical_conflicts;
        let mut clauses = Vec::with_capacity(k * k.saturating_sub(1) * conflicts.len());

        for i in 0..k.saturating_sub(1) {
            for j in 0..k {
                for &(up, down) in conflicts {
                    clauses.push(Clause::binary(
                        -self.indexer.index(i, j, up),
                        -self.indexer.index(i + 1, j, down),
                    ));
                }
            }
        }

        clauses
    }

    pub fn indexer(&self) -> &VariableIndexer {
        &self.indexer
    }

    pub fn compatibility(&self) -> &CompatibilityTable {
        &self.compatibility
    }

    /// Clause counts per family, computed from the conflict table
    pub fn statistics(&self) -> ClauseStatistics {
        ClauseStatistics::predict(self.instance, &self.compatibility)
    }
}

/// Statistics about clause generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClauseStatistics {
    pub grid_size: usize,
    pub tile_count: usize,
    pub variables: usize,
    pub coverage: usize,
    pub uniqueness: usize,
    pub horizontal: usize,
    pub vertical: usize,
}

impl ClauseStatistics {
    /// Family sizes without materializing any clause
    pub fn predict(instance: &Instance, compatibility: &CompatibilityTable) -> Self {
        let k = instance.grid_size();
        let t = instance.tile_count();
        let adjacencies = k * k.saturating_sub(1);

        Self {
            grid_size: k,
            tile_count: t,
            variables: instance.variable_count(),
            coverage: k * k,
            uniqueness: k * k * t * t.saturating_sub(1) / 2,
            horizontal: adjacencies * compatibility.horizontal_conflicts.len(),
            vertical: adjacencies * compatibility.vertical_conflicts.len(),
        }
    }

    pub fn total_clauses(&self) -> usize {
        self.coverage + self.uniqueness + self.horizontal + self.vertical
    }
}

impl fmt::Display for ClauseStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Clause Generation Statistics:")?;
        writeln!(f, "  Grid size: {}x{}", self.grid_size, self.grid_size)?;
        writeln!(f, "  Tiles: {}", self.tile_count)?;
        writeln!(f, "  Variables: {}", self.variables)?;
        writeln!(f, "  Coverage clauses: {}", self.coverage)?;
        writeln!(f, "  Uniqueness clauses: {}", self.uniqueness)?;
        writeln!(f, "  Horizontal clauses: {}", self.horizontal)?;
        writeln!(f, "  Vertical clauses: {}", self.vertical)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses())?;
        Ok(())
    }
}
