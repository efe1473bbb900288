//! Square Tiling SAT Solver
//!
//! Decides whether a k×k grid can be covered by edge-colored square tiles so
//! that every shared edge matches, by reducing the question to CNF
//! satisfiability and decoding the solver's model back into a placement.

pub mod config;
pub mod error;
pub mod puzzle;
pub mod sat;
pub mod tiling;
pub mod utils;

pub use config::Settings;
pub use error::{ConfigurationError, DecodeError};
pub use puzzle::{Solution, TilingOutcome, TilingProblem};

use anyhow::Result;
use sat::UnifiedSatSolver;

/// Main entry point: load the configured instance and solve it with the configured backend
pub fn solve_tiling(settings: Settings) -> Result<TilingOutcome> {
    let mut solver = UnifiedSatSolver::new(&settings.solver, settings.output.cnf_file.clone());
    let problem = TilingProblem::new(settings)?;
    problem.solve(&mut solver)
}
