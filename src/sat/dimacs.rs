//! DIMACS CNF serialization and solver model parsing

use super::constraints::Clause;
use anyhow::{Context, Result};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A complete formula: variable count plus clauses in generation order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cnf {
    /// Number of variables
    pub num_variables: usize,
    pub clauses: Vec<Clause>,
}

impl Cnf {
    pub fn new(num_variables: usize, clauses: Vec<Clause>) -> Self {
        Self { num_variables, clauses }
    }

    pub fn num_clauses(&self) -> usize {
        self.clauses.len()
    }

    /// Split into `(clauses, variable_count)`
    pub fn into_parts(self) -> (Vec<Clause>, usize) {
        (self.clauses, self.num_variables)
    }

    /// Write the `p cnf` header and one `0`-terminated line per clause
    pub fn write_dimacs<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "p cnf {} {}", self.num_variables, self.clauses.len())?;
        for clause in &self.clauses {
            for literal in &clause.literals {
                write!(writer, "{} ", literal)?;
            }
            writeln!(writer, "0")?;
        }
        Ok(())
    }

    pub fn to_dimacs_string(&self) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_dimacs(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Save the formula, creating parent directories as needed
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create CNF file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_dimacs(&mut writer)
            .and_then(|_| writer.flush())
            .with_context(|| format!("Failed to write CNF file: {}", path.display()))?;

        Ok(())
    }
}

/// Collect the literals of all `v` lines in solver output
///
/// Reading stops at the terminating `0`; other lines are ignored.
pub fn parse_model(output: &str) -> Result<Vec<i32>> {
    let mut model = Vec::new();

    for line in output.lines() {
        let mut tokens = line.split_whitespace();
        if tokens.next() != Some("v") {
            continue;
        }
        for token in tokens {
            let literal: i32 = token
                .parse()
                .with_context(|| format!("Invalid literal '{}' in model line: {}", token, line))?;
            if literal == 0 {
                return Ok(model);
            }
            model.push(literal);
        }
    }

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Cnf {
        Cnf::new(3, vec![Clause::new(vec![1, 2, 3]), Clause::binary(-1, -2)])
    }

    #[test]
    fn test_dimacs_format() {
        assert_eq!(sample().to_dimacs_string(), "p cnf 3 2\n1 2 3 0\n-1 -2 0\n");
    }

    #[test]
    fn test_empty_formula() {
        assert_eq!(Cnf::new(0, vec![]).to_dimacs_string(), "p cnf 0 0\n");
    }

    #[test]
    fn test_save_to_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("out/formula.cnf");

        sample().save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("p cnf 3 2\n"));
        assert_eq!(content.lines().count(), 3);
    }

    #[test]
    fn test_parse_model() {
        let output = "c comment\ns SATISFIABLE\nv 1 -2 3\nv -4 5 0\n";
        assert_eq!(parse_model(output).unwrap(), vec![1, -2, 3, -4, 5]);
    }

    #[test]
    fn test_parse_model_stops_at_terminator() {
        let output = "v 1 0 7\nv 9\n";
        assert_eq!(parse_model(output).unwrap(), vec![1]);
    }

    #[test]
    fn test_parse_model_without_v_lines() {
        assert!(parse_model("s SATISFIABLE\n").unwrap().is_empty());
        assert!(parse_model("v 1 x 0\n").is_err());
    }

    #[test]
    fn test_into_parts() {
        let (clauses, variables) = sample().into_parts();
        assert_eq!(variables, 3);
        assert_eq!(clauses.len(), 2);
    }
}
