//! Display and output formatting utilities

use crate::board::{grid_to_string, Grid};
use crate::config::OutputFormat;
use crate::puzzle::{BatchResult, Solution};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Format solutions for display
pub struct SolutionFormatter;

impl SolutionFormatter {
    /// Format a single solution for console output
    pub fn format_solution(solution: &Solution) -> String {
        let mut output = String::new();

        output.push_str(&format!("=== Solution {} ===\n", solution.metadata.id));
        output.push_str(&format!("Backend: {:?}\n", solution.backend));
        output.push_str(&format!("Solve Time: {:.3}s\n", solution.solve_time.as_secs_f64()));
        output.push_str(&format!(
            "Mines: {}  Safe: {}\n",
            solution.metadata.mine_count, solution.metadata.safe_count
        ));
        output.push_str(match solution.is_unique {
            Some(true) => "Placement: unique\n",
            Some(false) => "Placement: ambiguous (other placements exist)\n",
            None => "Placement: uniqueness not checked\n",
        });

        output.push('\n');
        output.push_str("Puzzle:\n");
        output.push_str(&Self::format_grid_with_coords(&solution.puzzle));
        output.push('\n');
        output.push_str("Solved:\n");
        output.push_str(&Self::format_grid_with_coords(&solution.solved));

        output
    }

    /// Format a board with coordinates
    pub fn format_grid_with_coords(grid: &Grid) -> String {
        let mut output = String::new();

        // Header with column numbers
        output.push_str("   ");
        for col in 0..grid.cols {
            output.push_str(&format!("{:2}", col % 10));
        }
        output.push('\n');

        // Rows with row numbers
        for (row, cells) in grid.cells.chunks(grid.cols.max(1)).enumerate() {
            output.push_str(&format!("{:2} ", row));
            for cell in cells {
                output.push_str(&format!("{:>2}", cell.symbol()));
            }
            output.push('\n');
        }

        output
    }

    /// Format batch results as a summary table
    pub fn format_batch_summary(results: &[BatchResult]) -> String {
        let mut output = String::new();

        output.push_str("Batch Summary:\n");
        output.push_str("Board            | Result      | Mines | Unique | Time(ms)\n");
        output.push_str("-----------------|-------------|-------|--------|---------\n");

        for entry in results {
            match &entry.result {
                Ok(Some(solution)) => {
                    let unique = match solution.is_unique {
                        Some(true) => "yes",
                        Some(false) => "no",
                        None => "-",
                    };
                    output.push_str(&format!(
                        "{:16} | {:11} | {:5} | {:6} | {:8}\n",
                        entry.name,
                        "solved",
                        solution.metadata.mine_count,
                        unique,
                        solution.solve_time.as_millis()
                    ));
                }
                Ok(None) => {
                    output.push_str(&format!(
                        "{:16} | {:11} | {:>5} | {:>6} | {:>8}\n",
                        entry.name, "no solution", "-", "-", "-"
                    ));
                }
                Err(e) => {
                    output.push_str(&format!("{:16} | error: {:#}\n", entry.name, e));
                }
            }
        }

        output
    }

    /// Save a solution under `output_dir` named after `stem`; returns the written path
    pub fn save_solution<P: AsRef<Path>>(
        solution: &Solution,
        output_dir: P,
        stem: &str,
        format: OutputFormat,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create directory {}", output_dir.display()))?;

        let filepath = match format {
            OutputFormat::Text => {
                let filepath = output_dir.join(format!("{}_solution.txt", stem));
                std::fs::write(&filepath, grid_to_string(&solution.solved))?;
                filepath
            }
            OutputFormat::Json => {
                let filepath = output_dir.join(format!("{}_solution.json", stem));
                solution.save_to_file(&filepath)?;
                filepath
            }
        };

        Ok(filepath)
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

    /// Check if terminal supports color
    fn supports_color() -> bool {
        std::env::var("NO_COLOR").is_err()
            && (std::env::var("TERM").unwrap_or_default() != "dumb")
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
    use crate::board::{load_grid_from_file, parse_grid_from_string};
    use crate::config::SolverBackend;
    use std::time::Duration;
    use tempfile::tempdir;

    fn solution() -> Solution {
        let puzzle = parse_grid_from_string("3 3\n_,1,0\n1,1,0\n0,0,0\n").unwrap();
        let solved = parse_grid_from_string("3 3\nT,1,0\n1,1,0\n0,0,0\n").unwrap();
        Solution::new(
            puzzle,
            solved,
            SolverBackend::Cadical,
            1,
            Some(true),
            Duration::from_millis(2),
        )
    }

    #[test]
    fn test_grid_formatting() {
        let grid = parse_grid_from_string("2 3\n_,1,T\nG,0,_\n").unwrap();

        let with_coords = SolutionFormatter::format_grid_with_coords(&grid);
        assert!(with_coords.starts_with("    0 1 2\n"));
        assert!(with_coords.contains(" 1  G 0 _"));
    }

    #[test]
    fn test_format_solution() {
        let text = SolutionFormatter::format_solution(&solution());
        assert!(text.contains("Mines: 1  Safe: 0"));
        assert!(text.contains("Placement: unique"));
        assert!(text.contains(" 0  T 1 0"));
    }

    #[test]
    fn test_batch_summary() {
        let results = vec![
            BatchResult { name: "corner".to_string(), result: Ok(Some(solution())) },
            BatchResult { name: "contradiction".to_string(), result: Ok(None) },
            BatchResult { name: "broken".to_string(), result: Err(anyhow::anyhow!("bad file")) },
        ];
        let summary = SolutionFormatter::format_batch_summary(&results);

        assert!(summary.contains("corner"));
        assert!(summary.contains("no solution"));
        assert!(summary.contains("error: bad file"));
    }

    #[test]
    fn test_save_solution() {
        let temp_dir = tempdir().unwrap();

        let text_path =
            SolutionFormatter::save_solution(&solution(), temp_dir.path(), "corner", OutputFormat::Text)
                .unwrap();
        assert_eq!(load_grid_from_file(&text_path).unwrap(), solution().solved);

        let json_path =
            SolutionFormatter::save_solution(&solution(), temp_dir.path(), "corner", OutputFormat::Json)
                .unwrap();
        let restored = Solution::from_json(&std::fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(restored.metadata.mine_count, 1);
    }

    #[test]
    fn test_color_output() {
        let colored = ColorOutput::colored("test", Color::Red);
        // Should either be colored or plain text
        assert!(colored.contains("test"));

        let success = ColorOutput::success("OK");
        assert!(success.contains("OK"));
    }
}
