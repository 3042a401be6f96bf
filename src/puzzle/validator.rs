//! Checks a decoded board against the puzzle it came from

use crate::board::{neighbors_of, Cell, Grid, Position};

/// Validates solved boards
#[derive(Debug, Clone, Copy, Default)]
pub struct SolutionValidator;

/// Result of solution validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub violations: Vec<Violation>,
    pub error_message: Option<String>,
}

/// One way in which a solved board disagrees with its puzzle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    DimensionMismatch {
        puzzle: (usize, usize),
        solved: (usize, usize),
    },
    /// A board stores a different number of cells than its dimensions imply
    CellCountMismatch {
        rows: usize,
        cols: usize,
        stored: usize,
    },
    /// A revealed cell was changed
    RevealedCellChanged {
        position: Position,
        expected: Cell,
        actual: Cell,
    },
    /// An unknown cell was left undecided or got a hint
    UndecidedCell { position: Position, actual: Cell },
    /// A hint doesn't match the number of adjacent mines
    HintMismatch {
        position: Position,
        hint: u8,
        adjacent_mines: usize,
    },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Violation::DimensionMismatch { puzzle, solved } => write!(
                f,
                "puzzle is {}x{} but solution is {}x{}",
                puzzle.0, puzzle.1, solved.0, solved.1
            ),
            Violation::CellCountMismatch { rows, cols, stored } => {
                write!(f, "{}x{} board stores {} cells", rows, cols, stored)
            }
            Violation::RevealedCellChanged { position, expected, actual } => write!(
                f,
                "cell {} changed from {} to {}",
                position,
                expected.symbol(),
                actual.symbol()
            ),
            Violation::UndecidedCell { position, actual } => {
                write!(f, "cell {} is {} instead of T or G", position, actual.symbol())
            }
            Violation::HintMismatch { position, hint, adjacent_mines } => write!(
                f,
                "hint {} at {} has {} adjacent mines",
                hint, position, adjacent_mines
            ),
        }
    }
}

impl SolutionValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate that `solved` is a consistent completion of `puzzle`
    pub fn validate(&self, puzzle: &Grid, solved: &Grid) -> ValidationResult {
        let mut violations = Vec::new();

        if puzzle.size() != solved.size() {
            violations.push(Violation::DimensionMismatch {
                puzzle: (puzzle.rows, puzzle.cols),
                solved: (solved.rows, solved.cols),
            });
            return Self::finish(violations);
        }

        for grid in [puzzle, solved] {
            if grid.cells.len() != grid.size().cell_count() {
                violations.push(Violation::CellCountMismatch {
                    rows: grid.rows,
                    cols: grid.cols,
                    stored: grid.cells.len(),
                });
            }
        }
        if !violations.is_empty() {
            return Self::finish(violations);
        }

        for pos in puzzle.size().positions() {
            let expected = puzzle.cells[puzzle.index(pos)];
            let actual = solved.cells[solved.index(pos)];

            match expected {
                Cell::Unknown => {
                    if !matches!(actual, Cell::Mine | Cell::Safe) {
                        violations.push(Violation::UndecidedCell { position: pos, actual });
                    }
                }
                _ if actual != expected => {
                    violations.push(Violation::RevealedCellChanged {
                        position: pos,
                        expected,
                        actual,
                    });
                }
                Cell::Hint(hint) => {
                    let adjacent_mines = Self::count_adjacent_mines(solved, pos);
                    if adjacent_mines != hint as usize {
                        violations.push(Violation::HintMismatch {
                            position: pos,
                            hint,
                            adjacent_mines,
                        });
                    }
                }
                _ => {}
            }
        }

        Self::finish(violations)
    }

    /// Mines among the neighbours of `pos` in `grid`
    pub fn count_adjacent_mines(grid: &Grid, pos: Position) -> usize {
        neighbors_of(pos, grid.size())
            .into_iter()
            .filter(|&p| grid.get(p) == Some(Cell::Mine))
            .count()
    }

    fn finish(violations: Vec<Violation>) -> ValidationResult {
        let error_message = if violations.is_empty() {
            None
        } else {
            let mut message = format!("{} violation(s): ", violations.len());
            let shown: Vec<String> = violations.iter().take(3).map(|v| v.to_string()).collect();
            message.push_str(&shown.join("; "));
            if violations.len() > 3 {
                message.push_str(&format!("; ... and {} more", violations.len() - 3));
            }
            Some(message)
        };

        ValidationResult {
            is_valid: violations.is_empty(),
            violations,
            error_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_grid_from_string;

    fn puzzle() -> Grid {
        parse_grid_from_string("3 3\n_,1,0\n1,1,0\n0,0,0\n").unwrap()
    }

    #[test]
    fn test_valid_solution() {
        let solved = parse_grid_from_string("3 3\nT,1,0\n1,1,0\n0,0,0\n").unwrap();
        let result = SolutionValidator::new().validate(&puzzle(), &solved);

        assert!(result.is_valid);
        assert!(result.violations.is_empty());
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_hint_mismatch() {
        let solved = parse_grid_from_string("3 3\nG,1,0\n1,1,0\n0,0,0\n").unwrap();
        let result = SolutionValidator::new().validate(&puzzle(), &solved);

        assert!(!result.is_valid);
        assert_eq!(result.violations.len(), 3);
        assert!(result.violations.contains(&Violation::HintMismatch {
            position: Position::new(0, 1),
            hint: 1,
            adjacent_mines: 0,
        }));
        assert!(result.error_message.unwrap().starts_with("3 violation(s)"));
    }

    #[test]
    fn test_changed_and_undecided_cells() {
        let solved = parse_grid_from_string("3 3\n_,1,0\n1,2,0\n0,0,0\n").unwrap();
        let result = SolutionValidator::new().validate(&puzzle(), &solved);

        assert!(result.violations.contains(&Violation::UndecidedCell {
            position: Position::new(0, 0),
            actual: Cell::Unknown,
        }));
        assert!(result.violations.contains(&Violation::RevealedCellChanged {
            position: Position::new(1, 1),
            expected: Cell::Hint(1),
            actual: Cell::Hint(2),
        }));
    }

    #[test]
    fn test_dimension_mismatch() {
        let solved = parse_grid_from_string("1 1\nT\n").unwrap();
        let result = SolutionValidator::new().validate(&puzzle(), &solved);

        assert!(!result.is_valid);
        assert!(matches!(
            result.violations[0],
            Violation::DimensionMismatch { puzzle: (3, 3), solved: (1, 1) }
        ));
    }

    #[test]
    fn test_short_cell_buffer_reported() {
        let mut solved = parse_grid_from_string("3 3\nT,1,0\n1,1,0\n0,0,0\n").unwrap();
        solved.cells.truncate(4);
        let result = SolutionValidator::new().validate(&puzzle(), &solved);

        assert!(!result.is_valid);
        assert_eq!(
            result.violations,
            vec![Violation::CellCountMismatch { rows: 3, cols: 3, stored: 4 }]
        );
    }
}
