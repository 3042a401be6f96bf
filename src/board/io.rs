//! File I/O for Minesweeper boards
//!
//! Format: the first line holds `rows cols`; each following non-empty line is
//! one row of comma-separated cells. `_` marks an unknown cell, `0`-`8` a hint,
//! and solved boards use `T` (mine) and `G` (safe).

use super::grid::{Cell, Grid, MAX_HINT};
use crate::error::{MinesweeperError, Result as BoardResult};
use anyhow::{Context, Result};
use log::warn;
use std::path::Path;

/// Load a board from a text file
pub fn load_grid_from_file<P: AsRef<Path>>(path: P) -> Result<Grid> {
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read board file: {}", path.as_ref().display()))?;

    parse_grid_from_string(&content)
        .with_context(|| format!("Failed to parse board from file: {}", path.as_ref().display()))
}

/// Parse a board from its text representation
pub fn parse_grid_from_string(content: &str) -> BoardResult<Grid> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (header_line, header) = lines.next().ok_or_else(|| MinesweeperError::Parse {
        line: 1,
        message: "board file is empty".to_string(),
    })?;
    let (rows, cols) = parse_header(header_line, header)?;

    let mut cells = Vec::with_capacity(rows);
    for (line_no, line) in lines {
        let row_idx = cells.len();
        let row = line
            .split(',')
            .enumerate()
            .map(|(col_idx, token)| parse_cell(token.trim(), line_no, row_idx, col_idx))
            .collect::<BoardResult<Vec<Cell>>>()?;

        if row.len() != cols {
            return Err(MinesweeperError::MalformedGrid(format!(
                "row {} has {} cells, header declares {}",
                row_idx,
                row.len(),
                cols
            )));
        }
        cells.push(row);
    }

    if cells.len() != rows {
        return Err(MinesweeperError::DimensionMismatch {
            expected_rows: rows,
            expected_cols: cols,
            actual_rows: cells.len(),
            actual_cols: cols,
        });
    }

    Grid::from_cells(cells)
}

fn parse_header(line_no: usize, header: &str) -> BoardResult<(usize, usize)> {
    let dims = header
        .split_whitespace()
        .map(|tok| tok.parse::<usize>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| MinesweeperError::Parse {
            line: line_no,
            message: format!("invalid size header '{}': {}", header, e),
        })?;

    match dims.as_slice() {
        [rows, cols] if *rows > 0 && *cols > 0 => Ok((*rows, *cols)),
        _ => Err(MinesweeperError::Parse {
            line: line_no,
            message: format!("size header must be two positive integers, got '{}'", header),
        }),
    }
}

fn parse_cell(token: &str, line_no: usize, row: usize, col: usize) -> BoardResult<Cell> {
    match token {
        "_" => Ok(Cell::Unknown),
        "T" => Ok(Cell::Mine),
        "G" => Ok(Cell::Safe),
        _ => {
            let value: u8 = token.parse().map_err(|_| MinesweeperError::Parse {
                line: line_no,
                message: format!("invalid cell '{}' at ({}, {})", token, row, col),
            })?;
            if value > MAX_HINT {
                return Err(MinesweeperError::HintOutOfRange { row, col, value });
            }
            Ok(Cell::Hint(value))
        }
    }
}

/// Convert a board to its text representation
pub fn grid_to_string(grid: &Grid) -> String {
    let mut result = format!("{} {}\n", grid.rows, grid.cols);

    for row in grid.cells.chunks(grid.cols.max(1)) {
        let line: Vec<String> = row.iter().map(|c| c.symbol()).collect();
        result.push_str(&line.join(","));
        result.push('\n');
    }

    result
}

/// Save a board to a text file, creating parent directories
pub fn save_grid_to_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    std::fs::write(&path, grid_to_string(grid))
        .with_context(|| format!("Failed to write board to file: {}", path.as_ref().display()))?;

    Ok(())
}

/// Read every `.txt` board in a directory, sorted by file stem.
/// Each entry keeps its own load result so malformed boards stay visible.
pub fn load_puzzle_files<P: AsRef<Path>>(dir_path: P) -> Result<Vec<(String, Result<Grid>)>> {
    let dir = std::fs::read_dir(&dir_path)
        .with_context(|| format!("Failed to read directory: {}", dir_path.as_ref().display()))?;

    let mut entries = Vec::new();

    for entry in dir {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();

        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();

        entries.push((name, load_grid_from_file(&path)));
    }

    entries.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(entries)
}

/// Load every `.txt` board in a directory, sorted by file stem.
/// Unreadable boards are skipped with a warning.
pub fn load_grids_from_directory<P: AsRef<Path>>(dir_path: P) -> Result<Vec<(String, Grid)>> {
    Ok(load_puzzle_files(dir_path)?
        .into_iter()
        .filter_map(|(name, loaded)| match loaded {
            Ok(grid) => Some((name, grid)),
            Err(e) => {
                warn!("Skipping {}: {:#}", name, e);
                None
            }
        })
        .collect())
}

/// Write a few example puzzles into `output_dir`
pub fn create_example_puzzles<P: AsRef<Path>>(output_dir: P) -> Result<()> {
    let dir = output_dir.as_ref();
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    // single mine in the top-left corner
    let corner = "3 3\n_,1,0\n1,1,0\n0,0,0\n";
    std::fs::write(dir.join("corner.txt"), corner).context("Failed to write corner.txt")?;

    let ring = "3 3\n_,_,_\n_,8,_\n_,_,_\n";
    std::fs::write(dir.join("ring.txt"), ring).context("Failed to write ring.txt")?;

    let strip = "4 5\n1,_,_,_,1\n1,2,_,2,1\n0,1,1,1,0\n0,0,0,0,0\n";
    std::fs::write(dir.join("strip.txt"), strip).context("Failed to write strip.txt")?;

    let contradiction = "2 2\n0,_\n_,3\n";
    std::fs::write(dir.join("contradiction.txt"), contradiction)
        .context("Failed to write contradiction.txt")?;

    Ok(())
}
