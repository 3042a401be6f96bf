//! Minesweeper SAT Solver
//!
//! This library turns a partially revealed Minesweeper board into a CNF
//! formula, hands it to a SAT solver, and reads the model back as a board
//! with every unknown cell marked as a mine or safe.

pub mod board;
pub mod config;
pub mod error;
pub mod puzzle;
pub mod sat;
pub mod utils;

pub use config::Settings;
pub use error::MinesweeperError;
pub use puzzle::{MinesweeperProblem, Solution};

use anyhow::Result;

/// Main entry point: solve the puzzle file named in `settings`
pub fn solve_puzzle(settings: Settings) -> Result<Option<Solution>> {
    let problem = MinesweeperProblem::new(settings)?;
    problem.solve()
}
