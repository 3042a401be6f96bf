//! Decoding solver models into boards, and the solution record

use crate::board::{Cell, Grid, Position};
use crate::config::SolverBackend;
use crate::sat::{to_variable, Assignment};
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn a satisfying assignment back into a board.
///
/// Revealed cells are copied unchanged. Each unknown cell is looked up by its
/// variable: true becomes [`Cell::Mine`], anything else [`Cell::Safe`]. Cells
/// the assignment doesn't mention are treated as safe and reported once as a
/// warning, since that means the model came from a different formula.
pub fn decode(assignment: &Assignment, grid: &Grid) -> Grid {
    let size = grid.size();
    let mut solved = grid.clone();
    let mut missing = Vec::new();

    for pos in size.positions() {
        if !grid.is_unknown(pos) {
            continue;
        }

        let cell = match assignment.value(to_variable(pos, size)) {
            Some(true) => Cell::Mine,
            Some(false) => Cell::Safe,
            None => {
                missing.push(pos);
                Cell::Safe
            }
        };
        let idx = solved.index(pos);
        solved.cells[idx] = cell;
    }

    if !missing.is_empty() {
        warn!(
            "Assignment with {} literals does not cover {} unknown cell(s) of a {}x{} board (first: {}); marked safe",
            assignment.len(),
            missing.len(),
            grid.rows,
            grid.cols,
            missing[0]
        );
    }

    solved
}

/// A solved board together with how it was obtained
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    /// Board as given, hints and unknowns only
    pub puzzle: Grid,
    /// Board with every unknown cell marked mine or safe
    pub solved: Grid,
    pub backend: SolverBackend,
    /// Distinct placements seen while enumerating (capped by `max_solutions`)
    pub solutions_found: usize,
    /// `Some(true)` when enumeration proved this placement is the only one
    pub is_unique: Option<bool>,
    #[serde(skip)]
    pub solve_time: Duration,
    pub metadata: SolutionMetadata,
}

/// Metadata about a solution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionMetadata {
    pub id: String,
    pub mine_count: usize,
    pub safe_count: usize,
    pub mine_positions: Vec<Position>,
}

impl Solution {
    pub fn new(
        puzzle: Grid,
        solved: Grid,
        backend: SolverBackend,
        solutions_found: usize,
        is_unique: Option<bool>,
        solve_time: Duration,
    ) -> Self {
        let metadata = SolutionMetadata::analyze(&solved);
        Self {
            puzzle,
            solved,
            backend,
            solutions_found,
            is_unique,
            solve_time,
            metadata,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

impl SolutionMetadata {
    pub fn analyze(solved: &Grid) -> Self {
        Self {
            id: Self::generate_id(solved),
            mine_count: solved.mine_count(),
            safe_count: solved.safe_count(),
            mine_positions: solved.mines(),
        }
    }

    /// Stable identifier derived from the solved board
    fn generate_id(solved: &Grid) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        solved.hash(&mut hasher);
        format!("sol_{:x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_grid_from_string;

    fn puzzle() -> Grid {
        parse_grid_from_string("2 3\n_,1,0\n_,1,0\n").unwrap()
    }

    #[test]
    fn test_decode_marks_unknowns() {
        // variables: (0,0) = 1, (1,0) = 4
        let assignment = Assignment::from_literals(vec![1, -2, -3, -4, -5, -6]);
        let solved = decode(&assignment, &puzzle());

        assert_eq!(solved.get(Position::new(0, 0)), Some(Cell::Mine));
        assert_eq!(solved.get(Position::new(1, 0)), Some(Cell::Safe));
        assert_eq!(solved.unknown_count(), 0);
    }

    #[test]
    fn test_decode_leaves_revealed_cells_alone() {
        let grid = puzzle();
        // claims every variable is a mine, including the hint cells
        let assignment = Assignment::from_literals((1..=6).collect());
        let solved = decode(&assignment, &grid);

        for pos in grid.size().positions() {
            if !grid.is_unknown(pos) {
                assert_eq!(solved.get(pos), grid.get(pos));
            }
        }
        // input is not modified
        assert_eq!(grid, puzzle());
    }

    #[test]
    fn test_decode_uses_variables_not_raw_indices() {
        // out-of-order model: variable 4 is a mine, variable 1 is not
        let assignment = Assignment::from_literals(vec![4, -1]);
        let solved = decode(&assignment, &puzzle());

        assert_eq!(solved.get(Position::new(0, 0)), Some(Cell::Safe));
        assert_eq!(solved.get(Position::new(1, 0)), Some(Cell::Mine));
    }

    #[test]
    fn test_decode_short_assignment_degrades_to_safe() {
        let assignment = Assignment::from_literals(vec![1]);
        let solved = decode(&assignment, &puzzle());

        assert_eq!(solved.get(Position::new(0, 0)), Some(Cell::Mine));
        assert_eq!(solved.get(Position::new(1, 0)), Some(Cell::Safe));

        let empty = decode(&Assignment::from_literals(Vec::new()), &puzzle());
        assert_eq!(empty.mine_count(), 0);
        assert_eq!(empty.safe_count(), 2);
    }

    #[test]
    fn test_solution_json_round_trip() {
        let grid = puzzle();
        let solved = decode(&Assignment::from_literals(vec![1, -2, -3, -4, -5, -6]), &grid);
        let solution = Solution::new(
            grid,
            solved.clone(),
            SolverBackend::Cadical,
            1,
            Some(true),
            Duration::from_millis(3),
        );

        assert_eq!(solution.metadata.mine_count, 1);
        assert_eq!(solution.metadata.mine_positions, vec![Position::new(0, 0)]);
        assert!(solution.metadata.id.starts_with("sol_"));

        let json = solution.to_json().unwrap();
        let restored = Solution::from_json(&json).unwrap();
        assert_eq!(restored.solved, solved);
        assert_eq!(restored.is_unique, Some(true));
        assert_eq!(restored.solve_time, Duration::ZERO);
    }
}
