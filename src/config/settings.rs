//! Configuration settings for the square tiling solver

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub input: InputConfig,
    pub solver: SolverConfig,
    pub output: OutputConfig,
    pub encoding: EncodingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub instance_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    /// Executable used by the external backend
    pub command: String,
    pub verbosity: u32,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// In-process CaDiCaL
    Cadical,
    /// Any DIMACS solver reporting models on `v` lines
    External,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the DIMACS formula is written
    pub cnf_file: PathBuf,
    pub format: OutputFormat,
    pub save_solution: bool,
    pub output_directory: PathBuf,
    #[serde(default)]
    pub show_solver_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Generate uniqueness clauses on all cores
    pub parallel: bool,
    /// Reject tiles using colors at or above the declared color count
    pub enforce_color_bound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: InputConfig {
                instance_file: PathBuf::from("input.in"),
            },
            solver: SolverConfig {
                backend: SolverBackend::Cadical,
                command: "glucose-syrup".to_string(),
                verbosity: 1,
                extra_args: Vec::new(),
            },
            output: OutputConfig {
                cnf_file: PathBuf::from("formula.cnf"),
                format: OutputFormat::Text,
                save_solution: false,
                output_directory: PathBuf::from("output/solutions"),
                show_solver_output: false,
            },
            encoding: EncodingConfig {
                parallel: false,
                enforce_color_bound: false,
            },
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings to a YAML file
    pub fn to_file(&self, path: &PathBuf) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .context("Failed to serialize settings")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if !self.input.instance_file.exists() {
            anyhow::bail!("Instance file does not exist: {}", self.input.instance_file.display());
        }

        if self.solver.backend == SolverBackend::External && self.solver.command.trim().is_empty() {
            anyhow::bail!("External solver backend requires a solver command");
        }

        if self.output.cnf_file.as_os_str().is_empty() {
            anyhow::bail!("CNF output path must not be empty");
        }

        Ok(())
    }

    /// Merge settings with command line overrides
    pub fn merge_with_cli(&mut self, cli_overrides: &CliOverrides) {
        if let Some(ref input) = cli_overrides.input {
            self.input.instance_file = input.clone();
        }
        if let Some(ref output) = cli_overrides.cnf_output {
            self.output.cnf_file = output.clone();
        }
        if let Some(ref solver) = cli_overrides.solver {
            self.solver.command = solver.clone();
            // naming a solver executable implies running it
            self.solver.backend = SolverBackend::External;
        }
        if let Some(verbosity) = cli_overrides.verbosity {
            self.solver.verbosity = verbosity;
        }
        if let Some(backend) = cli_overrides.backend {
            self.solver.backend = backend;
        }
        if let Some(format) = cli_overrides.format {
            self.output.format = format;
        }
    }
}

/// Command line overrides for settings
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub input: Option<PathBuf>,
    pub cnf_output: Option<PathBuf>,
    pub solver: Option<String>,
    pub verbosity: Option<u32>,
    pub backend: Option<SolverBackend>,
    pub format: Option<OutputFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.input.instance_file, PathBuf::from("input.in"));
        assert_eq!(settings.output.cnf_file, PathBuf::from("formula.cnf"));
        assert_eq!(settings.solver.command, "glucose-syrup");
        assert_eq!(settings.solver.verbosity, 1);
        assert_eq!(settings.solver.backend, SolverBackend::Cadical);
        assert!(!settings.encoding.enforce_color_bound);
    }

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config/default.yaml");

        let mut settings = Settings::default();
        settings.solver.backend = SolverBackend::External;
        settings.solver.extra_args = vec!["-cpu-lim=10".to_string()];
        settings.output.format = OutputFormat::Json;
        settings.to_file(&path).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.solver.backend, SolverBackend::External);
        assert_eq!(loaded.solver.extra_args, vec!["-cpu-lim=10".to_string()]);
        assert_eq!(loaded.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_yaml_optional_fields() {
        let yaml = "input:\n  instance_file: a.in\n\
                    solver:\n  backend: external\n  command: ./glucose-syrup\n  verbosity: 0\n\
                    output:\n  cnf_file: f.cnf\n  format: text\n  save_solution: false\n  output_directory: out\n\
                    encoding:\n  parallel: true\n  enforce_color_bound: true\n";
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();

        assert!(settings.solver.extra_args.is_empty());
        assert!(!settings.output.show_solver_output);
        assert!(settings.encoding.parallel);
        assert_eq!(settings.solver.command, "./glucose-syrup");
    }

    #[test]
    fn test_validate() {
        let temp_dir = tempdir().unwrap();
        let instance = temp_dir.path().join("input.in");

        let mut settings = Settings::default();
        settings.input.instance_file = instance.clone();
        assert!(settings.validate().is_err());

        std::fs::write(&instance, "1\n1\n1\n0 0 0 0\n").unwrap();
        assert!(settings.validate().is_ok());

        settings.solver.backend = SolverBackend::External;
        settings.solver.command = "  ".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_merge_with_cli() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            input: Some(PathBuf::from("puzzle.in")),
            solver: Some("minisat".to_string()),
            verbosity: Some(0),
            ..Default::default()
        };
        settings.merge_with_cli(&overrides);

        assert_eq!(settings.input.instance_file, PathBuf::from("puzzle.in"));
        assert_eq!(settings.solver.command, "minisat");
        assert_eq!(settings.solver.backend, SolverBackend::External);
        assert_eq!(settings.solver.verbosity, 0);
        assert_eq!(settings.output.cnf_file, PathBuf::from("formula.cnf"));

        let overrides = CliOverrides {
            backend: Some(SolverBackend::Cadical),
            ..Default::default()
        };
        settings.merge_with_cli(&overrides);
        assert_eq!(settings.solver.backend, SolverBackend::Cadical);
    }
}
