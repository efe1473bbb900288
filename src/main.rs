//! Main CLI application for the square tiling SAT solver

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use square_tiling_sat::{
    config::{CliOverrides, OutputFormat, Settings, SolverBackend},
    puzzle::{PlacementValidator, TilingOutcome, TilingProblem},
    sat::UnifiedSatSolver,
    tiling::{create_example_instances, load_instance_from_file, load_placement_from_file},
    utils::{ColorOutput, PlacementFormatter},
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "square_tiling_sat")]
#[command(about = "Square edge-matching tiling via SAT")]
#[command(version = "0.1.0")]
struct Cli {
    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an instance, run the SAT solver and print the tiling
    Solve {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Instance file (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// DIMACS output file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// External solver executable; selects the external backend
        #[arg(short, long)]
        solver: Option<String>,

        /// Verbosity passed to the external solver
        #[arg(long = "verb")]
        verbosity: Option<u32>,

        /// Solver backend (overrides config)
        #[arg(short, long, value_enum)]
        backend: Option<SolverBackend>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Write the DIMACS formula without solving it
    Encode {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Instance file (overrides config)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// DIMACS output file (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Summarize an instance and predict the size of its encoding
    Analyze {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Instance file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Check a placement file against an instance
    Validate {
        /// Instance file
        #[arg(short, long)]
        input: PathBuf,

        /// Placement file: k rows of k tile indices, -1 for empty cells
        #[arg(short, long)]
        placement: PathBuf,
    },

    /// Create example configuration and instance files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve { config, input, output, solver, verbosity, backend, format } => {
            let overrides = CliOverrides {
                input,
                cnf_output: output,
                solver,
                verbosity,
                backend,
                format,
            };
            solve_command(config, overrides, cli.verbose)
        }
        Commands::Encode { config, input, output } => {
            let overrides = CliOverrides {
                input,
                cnf_output: output,
                ..Default::default()
            };
            encode_command(config, overrides)
        }
        Commands::Analyze { config, input } => analyze_command(config, input),
        Commands::Validate { input, placement } => validate_command(input, placement),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // a second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the config file if present, otherwise fall back to defaults
fn load_settings(config_path: &Path) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(&config_path.to_path_buf())
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        println!(
            "{}",
            ColorOutput::warning(&format!("Config file {} not found, using defaults", config_path.display()))
        );
        Ok(Settings::default())
    }
}

fn solve_command(config_path: PathBuf, overrides: CliOverrides, verbose: bool) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    if verbose {
        println!("Configuration:");
        println!("  Instance file: {}", settings.input.instance_file.display());
        println!("  Backend: {:?}", settings.solver.backend);
        if settings.solver.backend == SolverBackend::External {
            println!("  Solver command: {} (verbosity {})", settings.solver.command, settings.solver.verbosity);
            println!("  CNF file: {}", settings.output.cnf_file.display());
        }
        println!();
    }

    let start_time = Instant::now();
    let problem = TilingProblem::new(settings.clone()).context("Failed to create tiling problem")?;

    if verbose {
        println!("{}", problem.estimate_complexity());
    }

    let mut solver = UnifiedSatSolver::new(&settings.solver, settings.output.cnf_file.clone());
    let outcome = problem.solve(&mut solver).context("Failed to solve tiling problem")?;

    if settings.output.show_solver_output {
        if let Some(transcript) = solver.last_output() {
            print!("{}", transcript);
            println!();
        }
    }

    match &outcome {
        TilingOutcome::Unsatisfiable => {
            print!("{}", ColorOutput::warning(&PlacementFormatter::format_outcome(&outcome)));
        }
        TilingOutcome::MissingModel => {
            print!("{}", ColorOutput::error(&PlacementFormatter::format_outcome(&outcome)));
        }
        TilingOutcome::Solved(solution) => {
            match settings.output.format {
                OutputFormat::Text => print!("{}", PlacementFormatter::format_outcome(&outcome)),
                OutputFormat::Json => println!("{}", solution.to_json()?),
            }

            if solution.is_proper() {
                println!(
                    "{}",
                    ColorOutput::success(&format!("Found a proper tiling in {:.3}s", start_time.elapsed().as_secs_f64()))
                );
            } else {
                println!("{}", ColorOutput::warning("Decoded placement has problems:"));
                for anomaly in &solution.anomalies {
                    println!("  - {}", anomaly);
                }
                for violation in &solution.validation.violations {
                    println!("  - {}", violation);
                }
            }

            if settings.output.save_solution {
                let path = PlacementFormatter::save_solution(
                    solution,
                    &settings.output.output_directory,
                    settings.output.format,
                )
                .context("Failed to save solution")?;
                println!("Solution saved to {}", path.display());
            }
        }
    }

    if verbose {
        println!("\n{}", problem.encoding_statistics());
        if let Some(statistics) = solver.statistics() {
            println!("{}", statistics);
        }
    }

    Ok(())
}

fn encode_command(config_path: PathBuf, overrides: CliOverrides) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.merge_with_cli(&overrides);
    settings.validate().context("Configuration validation failed")?;

    let problem = TilingProblem::new(settings.clone()).context("Failed to create tiling problem")?;
    let cnf = problem.write_cnf()?;

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Wrote {} variables and {} clauses to {}",
            cnf.num_variables,
            cnf.num_clauses(),
            settings.output.cnf_file.display()
        ))
    );
    println!("{}", problem.encoding_statistics());

    Ok(())
}

fn analyze_command(config_path: PathBuf, input: PathBuf) -> Result<()> {
    let mut settings = load_settings(&config_path)?;
    settings.input.instance_file = input;

    let problem = TilingProblem::new(settings).context("Failed to create problem for analysis")?;
    let instance = problem.instance();

    println!(
        "Instance: {}x{} grid, {} tiles, {} colors",
        instance.grid_size(),
        instance.grid_size(),
        instance.tile_count(),
        instance.color_count()
    );
    println!("{}", PlacementFormatter::format_tiles(instance));

    let violations = instance.color_bound_violations();
    if !violations.is_empty() {
        println!(
            "{}",
            ColorOutput::warning(&format!("{} tile(s) use colors outside the declared range", violations.len()))
        );
    }

    let table = problem.compatibility();
    println!("Compatibility:");
    println!(
        "  Horizontal pairs: {} compatible, {} conflicting",
        table.horizontal_compatible(instance.tile_count()),
        table.horizontal_conflicts.len()
    );
    println!(
        "  Vertical pairs: {} compatible, {} conflicting",
        table.vertical_compatible(instance.tile_count()),
        table.vertical_conflicts.len()
    );
    println!();

    println!("{}", problem.encoding_statistics());
    println!("{}", problem.estimate_complexity());

    Ok(())
}

fn validate_command(instance_path: PathBuf, placement_path: PathBuf) -> Result<()> {
    let instance = load_instance_from_file(&instance_path)?;
    let placement = load_placement_from_file(&placement_path)?;

    let result = PlacementValidator::new(&instance).validate(&placement);
    println!("{}", result);

    if result.is_valid {
        println!("{}", ColorOutput::success("Placement is a proper tiling"));
    } else {
        println!("{}", ColorOutput::error("Placement is not a proper tiling"));
        for violation in &result.violations {
            println!("  - {}", violation);
        }
    }

    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let input_dir = directory.join("input/instances");
    let output_dir = directory.join("output/solutions");

    for dir in [&config_dir, &input_dir, &output_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        let mut default_settings = Settings::default();
        default_settings.input.instance_file = PathBuf::from("input/instances/checkerboard.in");
        default_settings
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_instances(&input_dir).context("Failed to create example instances")?;
    println!("Created example instances in: {}", input_dir.display());

    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    // glucose-style external solver, formula kept on disk
    let mut external_config = Settings::default();
    external_config.input.instance_file = PathBuf::from("input/instances/frame.in");
    external_config.solver.backend = SolverBackend::External;
    external_config.solver.command = "./glucose-syrup".to_string();
    external_config.output.show_solver_output = true;
    external_config.to_file(&examples_dir.join("external.yaml"))?;

    let mut json_config = Settings::default();
    json_config.input.instance_file = PathBuf::from("input/instances/disjoint.in");
    json_config.output.format = OutputFormat::Json;
    json_config.output.save_solution = true;
    json_config.encoding.parallel = true;
    json_config.to_file(&examples_dir.join("json.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your instances to {}", input_dir.display());
    println!("3. Run: cargo run -- solve --config config/default.yaml");

    Ok(())
}
