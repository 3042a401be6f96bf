//! SAT encoding of Minesweeper boards and solver backends

pub mod variables;
pub mod combinations;
pub mod constraints;
pub mod encoder;
pub mod solver;
pub mod varisat_solver;
pub mod solver_factory;

pub use variables::{to_position, to_variable, Literal, Variable};
pub use combinations::combinations;
pub use constraints::{Clause, ClauseSynthesizer, DirectEncoding};
pub use encoder::{build_formula, EncodingStatistics, Formula, SatEncoder};
pub use solver::{Assignment, FormulaSolver, SatSolver, SolveOutcome, SolverStatistics};
pub use varisat_solver::VarisatSolver;
pub use solver_factory::UnifiedSatSolver;
