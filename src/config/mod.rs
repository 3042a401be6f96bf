//! Configuration management for the Minesweeper SAT solver

pub mod settings;

pub use settings::{
    CliOverrides, InputConfig, OutputConfig, OutputFormat, Settings, SolverBackend, SolverConfig,
};
