//! Minesweeper problem definition and solution handling

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{solve_batch, solve_board, BatchResult, MinesweeperProblem};
pub use solution::{decode, Solution, SolutionMetadata};
pub use validator::{SolutionValidator, ValidationResult, Violation};
