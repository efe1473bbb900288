//! SAT solver capability and the in-process CaDiCaL backend

use super::constraints::Clause;
use super::dimacs::Cnf;
use anyhow::Result;
use cadical::Solver;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Anything that can decide a CNF formula
///
/// Implementations receive the complete formula and report either a model or
/// unsatisfiability. Errors are reserved for backends that could not run.
pub trait SatBackend {
    /// Short name used in logs and reports
    fn name(&self) -> &str;

    fn solve(&mut self, cnf: &Cnf) -> Result<SolveResult>;
}

/// Outcome of one solver run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    Satisfiable(SolverSolution),
    Unsatisfiable,
}

/// Model returned by a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverSolution {
    /// Signed literals; may be partial, unordered or empty
    pub model: Vec<i32>,
    pub solve_time: Duration,
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_time: Duration,
    pub result: SolverResultType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResultType {
    Satisfiable,
    Unsatisfiable,
    NotRun,
}

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    variable_count: usize,
    clause_count: usize,
    last_solve_time: Duration,
    last_result: SolverResultType,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            variable_count: 0,
            clause_count: 0,
            last_solve_time: Duration::ZERO,
            last_result: SolverResultType::NotRun,
        }
    }

    /// Add clauses to the solver
    pub fn add_clauses(&mut self, clauses: &[Clause]) -> Result<()> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    /// Add a single clause to the solver
    pub fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        if clause.is_empty() {
            anyhow::bail!("Cannot add empty clause (unsatisfiable)");
        }

        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }

        self.solver.add_clause(clause.literals.iter().copied());

        self.clause_count += 1;
        Ok(())
    }

    /// Solve the clauses added so far
    pub fn solve_current(&mut self) -> Result<SolveResult> {
        let start_time = Instant::now();
        let result = self.solver.solve();
        self.last_solve_time = start_time.elapsed();

        match result {
            Some(true) => {
                self.last_result = SolverResultType::Satisfiable;
                Ok(SolveResult::Satisfiable(SolverSolution {
                    model: self.extract_model(),
                    solve_time: self.last_solve_time,
                }))
            }
            Some(false) => {
                self.last_result = SolverResultType::Unsatisfiable;
                Ok(SolveResult::Unsatisfiable)
            }
            None => anyhow::bail!("CaDiCaL stopped without deciding the formula"),
        }
    }

    /// Signed literal for every variable the solver assigned
    fn extract_model(&self) -> Vec<i32> {
        (1..=self.variable_count as i32)
            .filter_map(|var| self.solver.value(var).map(|value| if value { var } else { -var }))
            .collect()
    }

    /// Get solver statistics
    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
            solve_time: self.last_solve_time,
            result: self.last_result,
        }
    }

    /// Reset the solver (clear all clauses)
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    pub fn clause_count(&self) -> usize {
        self.clause_count
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SatBackend for SatSolver {
    fn name(&self) -> &str {
        "cadical"
    }

    /// Solve `cnf` on a fresh CaDiCaL instance
    fn solve(&mut self, cnf: &Cnf) -> Result<SolveResult> {
        self.reset();
        self.add_clauses(&cnf.clauses)?;

        let result = self.solve_current()?;
        debug!(
            backend = "cadical",
            clauses = self.clause_count,
            seconds = self.last_solve_time.as_secs_f64(),
            "solver finished"
        );
        Ok(result)
    }
}

impl fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Result: {:?}", self.result)?;
        Ok(())
    }
}
