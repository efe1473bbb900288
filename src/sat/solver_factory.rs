//! Factory for creating SAT solver instances based on configuration

use super::dimacs::Cnf;
use super::external::ExternalSolver;
use super::solver::{SatBackend, SatSolver, SolveResult, SolverStatistics};
use crate::config::{SolverBackend, SolverConfig};
use anyhow::Result;
use std::path::PathBuf;

/// Unified SAT solver interface that can use different backends
pub enum UnifiedSatSolver {
    Cadical(SatSolver),
    External(ExternalSolver),
}

impl UnifiedSatSolver {
    /// Create a solver for the configured backend
    ///
    /// `cnf_path` is where the external backend writes its input formula.
    pub fn new(config: &SolverConfig, cnf_path: PathBuf) -> Self {
        match config.backend {
            SolverBackend::Cadical => UnifiedSatSolver::Cadical(SatSolver::new()),
            SolverBackend::External => UnifiedSatSolver::External(
                ExternalSolver::new(config.command.clone(), cnf_path)
                    .with_verbosity(config.verbosity)
                    .with_extra_args(config.extra_args.clone()),
            ),
        }
    }

    /// Get the backend type being used
    pub fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::Cadical(_) => SolverBackend::Cadical,
            UnifiedSatSolver::External(_) => SolverBackend::External,
        }
    }

    /// Raw solver transcript, only available for the external backend
    pub fn last_output(&self) -> Option<&str> {
        match self {
            UnifiedSatSolver::Cadical(_) => None,
            UnifiedSatSolver::External(solver) => solver.last_output(),
        }
    }

    /// Counters from the last in-process solve
    pub fn statistics(&self) -> Option<SolverStatistics> {
        match self {
            UnifiedSatSolver::Cadical(solver) => Some(solver.statistics()),
            UnifiedSatSolver::External(_) => None,
        }
    }
}

impl SatBackend for UnifiedSatSolver {
    fn name(&self) -> &str {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.name(),
            UnifiedSatSolver::External(solver) => solver.name(),
        }
    }

    fn solve(&mut self, cnf: &Cnf) -> Result<SolveResult> {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.solve(cnf),
            UnifiedSatSolver::External(solver) => solver.solve(cnf),
        }
    }
}

impl Default for UnifiedSatSolver {
    fn default() -> Self {
        UnifiedSatSolver::Cadical(SatSolver::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::sat::constraints::Clause;
    use crate::sat::solver::SolverResultType;

    #[test]
    fn test_cadical_solver_creation() {
        let settings = Settings::default();
        let solver = UnifiedSatSolver::new(&settings.solver, PathBuf::from("formula.cnf"));
        assert_eq!(solver.backend(), SolverBackend::Cadical);
        assert_eq!(solver.name(), "cadical");
        assert!(solver.last_output().is_none());
    }

    #[test]
    fn test_external_solver_creation() {
        let mut settings = Settings::default();
        settings.solver.backend = SolverBackend::External;
        settings.solver.command = "kissat".to_string();

        let solver = UnifiedSatSolver::new(&settings.solver, PathBuf::from("out.cnf"));
        assert_eq!(solver.backend(), SolverBackend::External);
        assert_eq!(solver.name(), "kissat");
        match solver {
            UnifiedSatSolver::External(external) => assert_eq!(external.cnf_path(), std::path::Path::new("out.cnf")),
            UnifiedSatSolver::Cadical(_) => panic!("expected external backend"),
        }
    }

    #[test]
    fn test_default_backend_solves() {
        let mut solver = UnifiedSatSolver::default();

        let sat = Cnf::new(1, vec![Clause::new(vec![1])]);
        match solver.solve(&sat).unwrap() {
            SolveResult::Satisfiable(solution) => assert_eq!(solution.model, vec![1]),
            SolveResult::Unsatisfiable => panic!("expected a model"),
        }

        let unsat = Cnf::new(1, vec![Clause::new(vec![1]), Clause::new(vec![-1])]);
        assert_eq!(solver.solve(&unsat).unwrap(), SolveResult::Unsatisfiable);
    }

    #[test]
    fn test_statistics_follow_backend() {
        let mut solver = UnifiedSatSolver::default();
        let cnf = Cnf::new(2, vec![Clause::new(vec![1, 2]), Clause::new(vec![-1])]);
        solver.solve(&cnf).unwrap();

        let statistics = solver.statistics().unwrap();
        assert_eq!(statistics.variable_count, 2);
        assert_eq!(statistics.clause_count, 2);
        assert_eq!(statistics.result, SolverResultType::Satisfiable);
        assert!(statistics.to_string().starts_with("SAT Solver Statistics:"));

        let mut settings = Settings::default();
        settings.solver.backend = SolverBackend::External;
        let external = UnifiedSatSolver::new(&settings.solver, PathBuf::from("formula.cnf"));
        assert!(external.statistics().is_none());
    }
}
