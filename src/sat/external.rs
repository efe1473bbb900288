//! External SAT solver invoked as a subprocess

use super::dimacs::{parse_model, Cnf};
use super::solver::{SatBackend, SolveResult, SolverSolution};
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Exit status used by SAT-competition solvers for a satisfiable formula
pub const SAT_EXIT_CODE: i32 = 10;
/// Exit status used by SAT-competition solvers for an unsatisfiable formula
pub const UNSAT_EXIT_CODE: i32 = 20;

/// Runs `<command> -model -verb=<n> [extra args] <cnf file>` and reads the model from stdout
#[derive(Debug, Clone)]
pub struct ExternalSolver {
    command: String,
    verbosity: u32,
    extra_args: Vec<String>,
    cnf_path: PathBuf,
    last_output: Option<String>,
}

impl ExternalSolver {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(command: S, cnf_path: P) -> Self {
        Self {
            command: command.into(),
            verbosity: 1,
            extra_args: Vec::new(),
            cnf_path: cnf_path.into(),
            last_output: None,
        }
    }

    pub fn with_verbosity(mut self, verbosity: u32) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn cnf_path(&self) -> &Path {
        &self.cnf_path
    }

    /// Raw stdout of the most recent run
    pub fn last_output(&self) -> Option<&str> {
        self.last_output.as_deref()
    }

    fn is_unsat_report(exit_code: Option<i32>, stdout: &str) -> bool {
        exit_code == Some(UNSAT_EXIT_CODE)
            || stdout.lines().any(|line| line.trim() == "s UNSATISFIABLE")
    }

    fn is_sat_report(exit_code: Option<i32>, stdout: &str) -> bool {
        exit_code == Some(SAT_EXIT_CODE)
            || stdout.lines().any(|line| line.trim() == "s SATISFIABLE")
    }
}

impl SatBackend for ExternalSolver {
    fn name(&self) -> &str {
        &self.command
    }

    fn solve(&mut self, cnf: &Cnf) -> Result<SolveResult> {
        cnf.save_to_file(&self.cnf_path)?;
        info!(
            command = %self.command,
            cnf = %self.cnf_path.display(),
            "running external solver"
        );

        let start_time = Instant::now();
        let output = Command::new(&self.command)
            .arg("-model")
            .arg(format!("-verb={}", self.verbosity))
            .args(&self.extra_args)
            .arg(&self.cnf_path)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to run SAT solver '{}'", self.command))?;
        let solve_time = start_time.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let exit_code = output.status.code();
        debug!(?exit_code, seconds = solve_time.as_secs_f64(), "external solver exited");
        if !stderr.is_empty() {
            warn!(command = %self.command, stderr, "external solver wrote to stderr");
        }

        let result = match exit_code {
            None => Err(anyhow!("SAT solver '{}' was terminated by a signal: {}", self.command, stderr)),
            Some(_) if Self::is_unsat_report(exit_code, &stdout) => Ok(SolveResult::Unsatisfiable),
            Some(_) if Self::is_sat_report(exit_code, &stdout) => parse_model(&stdout)
                .context("Failed to read model from solver output")
                .map(|model| SolveResult::Satisfiable(SolverSolution { model, solve_time })),
            Some(code) => Err(anyhow!(
                "SAT solver '{}' exited with code {} without a verdict: {}",
                self.command,
                code,
                stderr
            )),
        };

        self.last_output = Some(stdout);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::constraints::Clause;

    #[test]
    fn test_unsat_detection() {
        assert!(ExternalSolver::is_unsat_report(Some(20), ""));
        assert!(ExternalSolver::is_unsat_report(Some(0), "c x\ns UNSATISFIABLE\n"));
        assert!(!ExternalSolver::is_unsat_report(Some(10), "s SATISFIABLE\nv 1 0\n"));
    }

    #[test]
    fn test_sat_detection() {
        assert!(ExternalSolver::is_sat_report(Some(10), ""));
        assert!(ExternalSolver::is_sat_report(Some(0), "s SATISFIABLE\nv 1 0\n"));
        assert!(!ExternalSolver::is_sat_report(Some(1), "v 1 0\n"));
        assert!(!ExternalSolver::is_sat_report(Some(0), "s UNKNOWN\n"));
    }

    #[test]
    fn test_missing_solver_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut solver = ExternalSolver::new(
            "definitely-not-a-sat-solver-binary",
            temp_dir.path().join("formula.cnf"),
        );

        let cnf = Cnf::new(1, vec![Clause::unit(1)]);
        assert!(solver.solve(&cnf).is_err());
        // the formula is written before the solver is launched
        assert!(temp_dir.path().join("formula.cnf").exists());
    }

    #[cfg(unix)]
    fn fake_solver(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-solver.sh");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_solver_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = fake_solver(temp_dir.path(), "echo 's SATISFIABLE'\necho 'v 1 -2'\necho 'v 0'\nexit 10");

        let mut solver = ExternalSolver::new(script, temp_dir.path().join("formula.cnf")).with_verbosity(0);
        let cnf = Cnf::new(2, vec![Clause::new(vec![1, 2])]);

        match solver.solve(&cnf).unwrap() {
            SolveResult::Satisfiable(solution) => assert_eq!(solution.model, vec![1, -2]),
            SolveResult::Unsatisfiable => panic!("expected a model"),
        }
        assert!(solver.last_output().unwrap().contains("s SATISFIABLE"));
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_solver_unsat_exit_code() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = fake_solver(temp_dir.path(), "echo 's UNKNOWN'\nexit 20");

        let mut solver = ExternalSolver::new(script, temp_dir.path().join("formula.cnf"));
        let cnf = Cnf::new(1, vec![Clause::unit(1), Clause::unit(-1)]);

        assert_eq!(solver.solve(&cnf).unwrap(), SolveResult::Unsatisfiable);
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_solver_failure_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = fake_solver(
            temp_dir.path(),
            "echo 'c parse error: unknown option -model' >&2\nexit 1",
        );

        let mut solver = ExternalSolver::new(script, temp_dir.path().join("formula.cnf"));
        let cnf = Cnf::new(1, vec![Clause::unit(1)]);

        let err = solver.solve(&cnf).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("exited with code 1"));
        assert!(message.contains("unknown option -model"));
        assert_eq!(solver.last_output(), Some(""));
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_solver_sat_line_with_zero_exit() {
        let temp_dir = tempfile::tempdir().unwrap();
        let script = fake_solver(temp_dir.path(), "echo 's SATISFIABLE'\necho 'v -1 0'\nexit 0");

        let mut solver = ExternalSolver::new(script, temp_dir.path().join("formula.cnf"));
        let cnf = Cnf::new(1, vec![Clause::unit(-1)]);

        match solver.solve(&cnf).unwrap() {
            SolveResult::Satisfiable(solution) => assert_eq!(solution.model, vec![-1]),
            SolveResult::Unsatisfiable => panic!("expected a model"),
        }
    }
}
