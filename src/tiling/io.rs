//! File I/O for tiling instances and placements

use super::{Instance, Placement, Tile};
use crate::error::ConfigurationError;
use anyhow::{Context, Result};
use std::path::Path;

/// Load an instance from a text file
///
/// Format: grid size, number of colors and number of tiles on the first three
/// lines, then one tile per line as `top right bottom left`.
pub fn load_instance_from_file<P: AsRef<Path>>(path: P) -> Result<Instance> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read instance file: {}", path.as_ref().display()))?;

    parse_instance(&content)
        .with_context(|| format!("Failed to parse instance file: {}", path.as_ref().display()))
}

/// Parse an instance from its text representation
pub fn parse_instance(content: &str) -> Result<Instance, ConfigurationError> {
    let mut lines = content.lines().enumerate().map(|(idx, line)| (idx + 1, line.trim()));

    if content.trim().is_empty() {
        return Err(ConfigurationError::EmptyInput);
    }

    let (line, first) = lines
        .next()
        .filter(|(_, text)| !text.is_empty())
        .ok_or(ConfigurationError::MissingGridSize)?;
    let grid_size = parse_integer(line, first)?;
    if grid_size <= 0 {
        return Err(ConfigurationError::NonPositiveGridSize(grid_size));
    }

    let (line, second) = lines
        .next()
        .filter(|(_, text)| !text.is_empty())
        .ok_or(ConfigurationError::MissingColorCount)?;
    let color_count = parse_integer(line, second)?;
    if color_count <= 0 {
        return Err(ConfigurationError::NonPositiveColorCount(color_count));
    }

    let (line, third) = lines
        .next()
        .filter(|(_, text)| !text.is_empty())
        .ok_or(ConfigurationError::MissingTileCount)?;
    let declared = parse_integer(line, third)?;
    if declared < 0 {
        return Err(ConfigurationError::NegativeTileCount(declared));
    }

    let mut tiles = Vec::new();
    for (line, text) in lines.filter(|(_, text)| !text.is_empty()) {
        tiles.push(parse_tile(line, text)?);
    }

    if tiles.len() as i64 != declared {
        return Err(ConfigurationError::TileCountMismatch {
            expected: declared as usize,
            found: tiles.len(),
        });
    }

    let grid_size = usize::try_from(grid_size).map_err(|_| ConfigurationError::ProblemTooLarge {
        grid_size: usize::MAX,
        tiles: tiles.len(),
    })?;
    let color_count = u32::try_from(color_count).map_err(|_| ConfigurationError::InvalidInteger {
        line: 2,
        value: color_count.to_string(),
    })?;

    Instance::new(grid_size, color_count, tiles)
}

fn parse_integer(line: usize, text: &str) -> Result<i64, ConfigurationError> {
    text.parse::<i64>().map_err(|_| ConfigurationError::InvalidInteger {
        line,
        value: text.to_string(),
    })
}

fn parse_tile(line: usize, text: &str) -> Result<Tile, ConfigurationError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 4 {
        return Err(ConfigurationError::TileArity { line, found: parts.len() });
    }

    let mut colors = [0u32; 4];
    for (slot, part) in colors.iter_mut().zip(parts) {
        let value = parse_integer(line, part)?;
        *slot = u32::try_from(value).map_err(|_| {
            if value < 0 {
                ConfigurationError::NegativeColor { line, value }
            } else {
                ConfigurationError::InvalidInteger { line, value: part.to_string() }
            }
        })?;
    }

    Ok(Tile::from(colors))
}

/// Convert an instance to its text representation
pub fn instance_to_string(instance: &Instance) -> String {
    let mut result = format!(
        "{}\n{}\n{}\n",
        instance.grid_size(),
        instance.color_count(),
        instance.tile_count()
    );
    for tile in instance.tiles() {
        result.push_str(&tile.to_string());
        result.push('\n');
    }
    result
}

/// Save an instance to a text file
pub fn save_instance_to_file<P: AsRef<Path>>(instance: &Instance, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, instance_to_string(instance))
        .with_context(|| format!("Failed to write instance to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Parse a placement: one row per line, whitespace-separated tile indices, `-1` for empty cells
pub fn parse_placement(content: &str) -> Result<Placement> {
    let mut rows = Vec::new();

    for (row_idx, line) in content.lines().map(str::trim).filter(|l| !l.is_empty()).enumerate() {
        let mut row = Vec::new();
        for (col_idx, value) in line.split_whitespace().enumerate() {
            let value: i64 = value
                .parse()
                .with_context(|| format!("Invalid tile index '{}' at position ({}, {})", value, row_idx, col_idx))?;
            match value {
                v if v >= 0 => row.push(Some(v as usize)),
                -1 => row.push(None),
                v => anyhow::bail!("Invalid tile index {} at position ({}, {})", v, row_idx, col_idx),
            }
        }
        rows.push(row);
    }

    Placement::from_rows(rows)
}

/// Load a placement from a text file
pub fn load_placement_from_file<P: AsRef<Path>>(path: P) -> Result<Placement> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read placement file: {}", path.as_ref().display()))?;

    parse_placement(&content)
        .with_context(|| format!("Failed to parse placement from file: {}", path.as_ref().display()))
}

/// Create example instance files
pub fn create_example_instances<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // Two tiles that only fit next to each other, forcing a checkerboard
    let checkerboard = "4\n2\n2\n0 1 1 0\n1 0 0 1\n";
    std::fs::write(dir.join("checkerboard.in"), checkerboard)
        .context("Failed to write checkerboard.in")?;

    // No two tiles share a color, so no 2x2 tiling exists
    let disjoint = "2\n9\n2\n1 2 3 4\n5 6 7 8\n";
    std::fs::write(dir.join("disjoint.in"), disjoint)
        .context("Failed to write disjoint.in")?;

    // Two identical blank tiles; every arrangement is valid
    let blank = "2\n1\n2\n0 0 0 0\n0 0 0 0\n";
    std::fs::write(dir.join("blank.in"), blank)
        .context("Failed to write blank.in")?;

    // Corner, edge and center pieces of a 3x3 frame
    let frame = "3\n3\n9\n\
                 0 1 1 0\n0 1 1 1\n0 0 1 1\n\
                 1 1 1 0\n1 1 1 1\n1 0 1 1\n\
                 1 1 0 0\n1 1 0 1\n1 0 0 1\n";
    std::fs::write(dir.join("frame.in"), frame)
        .context("Failed to write frame.in")?;

    Ok(())
}
