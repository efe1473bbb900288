//! Display and output formatting utilities

use crate::config::OutputFormat;
use crate::puzzle::{Solution, TilingOutcome};
use crate::tiling::{Instance, Placement};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const UNSAT_MESSAGE: &str = "Instance is UNSAT: there is no proper tiling.";
pub const MISSING_MODEL_MESSAGE: &str = "SAT solver did not return a model.";

const BANNER_WIDTH: usize = 60;
const BANNER_TITLE: &str = "[ Human readable square tiling ]";

/// Format placements and solver outcomes for display
pub struct PlacementFormatter;

impl PlacementFormatter {
    /// Render any outcome the way it is shown to the user
    pub fn format_outcome(outcome: &TilingOutcome) -> String {
        match outcome {
            TilingOutcome::Solved(solution) => Self::format_placement(&solution.placement),
            TilingOutcome::Unsatisfiable => format!("{}\n", UNSAT_MESSAGE),
            TilingOutcome::MissingModel => format!("{}\n", MISSING_MODEL_MESSAGE),
        }
    }

    /// Banner followed by one line of tile indices per row, `-1` for empty cells
    pub fn format_placement(placement: &Placement) -> String {
        let mut output = Self::banner();
        output.push('\n');
        output.push_str(&placement.to_string());
        output
    }

    fn banner() -> String {
        let rule = "#".repeat(BANNER_WIDTH);
        let pad = BANNER_WIDTH.saturating_sub(BANNER_TITLE.len());
        let left = "#".repeat(pad / 2);
        let right = "#".repeat(pad - pad / 2);
        format!("{rule}\n{left}{BANNER_TITLE}{right}\n{rule}\n")
    }

    /// Placement plus validation and timing details
    pub fn format_solution(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ===\n", solution.metadata.id));
        output.push_str(&format!("Backend: {}\n", solution.metadata.backend));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!(
            "Tiles used: {} of {}\n",
            solution.metadata.distinct_tiles_used, solution.metadata.tile_count
        ));
        output.push_str(&format!(
            "Validation: {}\n",
            if solution.validation.is_valid { "VALID" } else { "INVALID" }
        ));

        if !solution.anomalies.is_empty() {
            output.push_str("Anomalies:\n");
            for anomaly in &solution.anomalies {
                output.push_str(&format!("  - {}\n", anomaly));
            }
        }
        if !solution.validation.violations.is_empty() {
            output.push_str("Violations:\n");
            for violation in &solution.validation.violations {
                output.push_str(&format!("  - {}\n", violation));
            }
        }

        output.push('\n');
        output.push_str(&Self::format_placement(&solution.placement));
        output
    }

    /// Tile table with the colors of each tile
    pub fn format_tiles(instance: &Instance) -> String {
        let mut output = String::from("  #   top right bottom left\n");
        for (index, tile) in instance.tiles().iter().enumerate() {
            output.push_str(&format!(
                "{:3} {:5} {:5} {:6} {:4}\n",
                index, tile.top, tile.right, tile.bottom, tile.left
            ));
        }
        output
    }

    /// Save a solution in the configured format, returning the written path
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        output_dir: P,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

        let path = match format {
            OutputFormat::Text => {
                let path = output_dir.join(format!("{}.txt", solution.metadata.id));
                std::fs::write(&path, Self::format_solution(solution))
                    .with_context(|| format!("Failed to write solution: {}", path.display()))?;
                path
            }
            OutputFormat::Json => {
                let path = output_dir.join(format!("{}.json", solution.metadata.id));
                solution.save_to_file(&path)?;
                path
            }
        };

        Ok(path)
    }
}

/// Color output utilities
pub struct ColorOutput;

impl ColorOutput {
    /// Format text with color (if terminal supports it)
    pub fn colored(text: &str, color: Color) -> String {
        if Self::supports_color() {
            format!("\x1b[{}m{}\x1b[0m", color.code(), text)
        } else {
            text.to_string()
        }
    }

    fn supports_color() -> bool {
        Self::color_allowed(
            std::env::var_os("NO_COLOR").is_some(),
            &std::env::var("TERM").unwrap_or_default(),
        )
    }

    /// `NO_COLOR` (any value) or a dumb terminal disables escape codes
    fn color_allowed(no_color: bool, term: &str) -> bool {
        !no_color && term != "dumb"
    }

    pub fn success(text: &str) -> String {
        Self::colored(text, Color::Green)
    }

    pub fn error(text: &str) -> String {
        Self::colored(text, Color::Red)
    }

    pub fn warning(text: &str) -> String {
        Self::colored(text, Color::Yellow)
    }

    pub fn info(text: &str) -> String {
        Self::colored(text, Color::Blue)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    fn code(self) -> u8 {
        match self {
            Color::Red => 31,
            Color::Green => 32,
            Color::Yellow => 33,
            Color::Blue => 34,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::PlacementValidator;
    use crate::sat::ClauseGenerator;
    use crate::tiling::Tile;
    use std::time::Duration;
    use tempfile::tempdir;

    fn solution() -> Solution {
        let instance = Instance::new(2, 1, vec![Tile::new(0, 0, 0, 0)]).unwrap();
        let placement = Placement::from_rows(vec![vec![Some(0), Some(0)], vec![None, Some(0)]]).unwrap();
        let validation = PlacementValidator::new(&instance).validate(&placement);
        let statistics = ClauseGenerator::new(&instance).statistics();
        Solution::new(placement, Vec::new(), validation, Duration::ZERO, "test", statistics)
    }

    #[test]
    fn test_banner_layout() {
        let banner = PlacementFormatter::banner();
        let lines: Vec<&str> = banner.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|line| line.len() == BANNER_WIDTH));
        assert_eq!(lines[1], "##############[ Human readable square tiling ]##############");
    }

    #[test]
    fn test_outcome_rendering() {
        assert_eq!(
            PlacementFormatter::format_outcome(&TilingOutcome::Unsatisfiable),
            "Instance is UNSAT: there is no proper tiling.\n"
        );
        assert_eq!(
            PlacementFormatter::format_outcome(&TilingOutcome::MissingModel),
            "SAT solver did not return a model.\n"
        );

        let rendered = PlacementFormatter::format_outcome(&TilingOutcome::Solved(solution()));
        assert!(rendered.ends_with("\n0 0\n-1 0\n"));
    }

    #[test]
    fn test_solution_details() {
        let text = PlacementFormatter::format_solution(&solution());
        assert!(text.contains("Validation: INVALID"));
        assert!(text.contains("cell (1, 0) has no tile"));
    }

    #[test]
    fn test_save_solution() {
        let temp_dir = tempdir().unwrap();
        let solution = solution();

        let text_path = PlacementFormatter::save_solution(&solution, temp_dir.path(), OutputFormat::Text).unwrap();
        assert!(text_path.extension().unwrap() == "txt");
        assert!(std::fs::read_to_string(&text_path).unwrap().contains("Human readable"));

        let json_path = PlacementFormatter::save_solution(&solution, temp_dir.path().join("json"), OutputFormat::Json).unwrap();
        let loaded = Solution::load_from_file(json_path).unwrap();
        assert_eq!(loaded.placement, solution.placement);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }

    #[test]
    fn test_no_color_disables_escapes() {
        assert!(!ColorOutput::color_allowed(true, "xterm-256color"));
        assert!(!ColorOutput::color_allowed(false, "dumb"));
        assert!(ColorOutput::color_allowed(false, "xterm-256color"));
        assert!(ColorOutput::color_allowed(false, ""));

        if std::env::var_os("NO_COLOR").is_some() {
            assert_eq!(ColorOutput::error("plain"), "plain");
        }
    }
}
