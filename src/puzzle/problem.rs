//! Minesweeper problem definition: encode, solve, decode, verify

use super::solution::decode;
use super::{Solution, SolutionValidator};
use crate::board::{load_grid_from_file, load_puzzle_files, Grid};
use crate::config::Settings;
use crate::sat::{
    to_variable, EncodingStatistics, FormulaSolver, SatEncoder, SolveOutcome, UnifiedSatSolver,
    Variable,
};
use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

/// Encode `grid`, hand it to `solver`, and decode the model.
///
/// Returns `Ok(None)` when no mine placement satisfies the hints.
pub fn solve_board<S: FormulaSolver + ?Sized>(grid: &Grid, solver: &mut S) -> Result<Option<Grid>> {
    let formula = SatEncoder::new()
        .build_formula(grid)
        .context("Failed to encode board")?;

    match solver.solve_formula(&formula)? {
        SolveOutcome::Satisfiable(assignment) => Ok(Some(decode(&assignment, grid))),
        SolveOutcome::Unsatisfiable => Ok(None),
    }
}

/// A single Minesweeper board to solve
pub struct MinesweeperProblem {
    settings: Settings,
    grid: Grid,
    encoder: SatEncoder,
    validator: SolutionValidator,
}

impl MinesweeperProblem {
    /// Create a new problem from settings, loading the configured puzzle file
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate_input()?;
        let grid = load_grid_from_file(&settings.input.puzzle_file)
            .context("Failed to load puzzle file")?;

        Self::with_grid(settings, grid)
    }

    /// Create a problem with an explicit board
    pub fn with_grid(settings: Settings, grid: Grid) -> Result<Self> {
        grid.validate_puzzle().context("Puzzle is malformed")?;

        Ok(Self {
            settings,
            grid,
            encoder: SatEncoder::new(),
            validator: SolutionValidator::new(),
        })
    }

    /// Solve with the backend named in the settings
    pub fn solve(&self) -> Result<Option<Solution>> {
        let mut solver = UnifiedSatSolver::new(self.settings.solver.backend);
        self.solve_with(&mut solver)
    }

    /// Solve with a caller-supplied backend.
    ///
    /// With `max_solutions > 1` further placements are enumerated so the
    /// solution can report whether it is unique.
    pub fn solve_with<S: FormulaSolver + ?Sized>(&self, solver: &mut S) -> Result<Option<Solution>> {
        let start_time = Instant::now();

        info!(
            "Solving {}x{} board: {} unknown cells, {} hints",
            self.grid.rows,
            self.grid.cols,
            self.grid.unknown_count(),
            self.grid.hint_count()
        );

        let formula = self
            .encoder
            .build_formula(&self.grid)
            .context("Failed to generate SAT constraints")?;
        debug!(
            "Generated {} clauses with {} variables",
            formula.clause_count(),
            formula.num_variables
        );

        let max_solutions = self.settings.solver.max_solutions.max(1);
        let models = solver
            .solve_multiple(&formula, max_solutions, &self.unknown_variables())
            .context("SAT solving failed")?;

        let Some(first) = models.first() else {
            info!("No mine placement is consistent with the hints");
            return Ok(None);
        };

        let solved = decode(first, &self.grid);

        if self.settings.solver.verify_solution {
            let validation = self.validator.validate(&self.grid, &solved);
            if !validation.is_valid {
                anyhow::bail!(
                    "Decoded board failed validation: {}",
                    validation.error_message.unwrap_or_default()
                );
            }
        }

        let is_unique = (max_solutions > 1).then(|| models.len() == 1);
        let solve_time = start_time.elapsed();
        info!(
            "Found {} placement(s) in {:.3}s",
            models.len(),
            solve_time.as_secs_f64()
        );

        Ok(Some(Solution::new(
            self.grid.clone(),
            solved,
            solver.backend(),
            models.len(),
            is_unique,
            solve_time,
        )))
    }

    /// Variables of the unknown cells, the only ones a placement decides
    fn unknown_variables(&self) -> Vec<Variable> {
        let size = self.grid.size();
        size.positions()
            .filter(|&pos| self.grid.is_unknown(pos))
            .map(|pos| to_variable(pos, size))
            .collect()
    }

    /// Get the board
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Get encoding statistics
    pub fn encoding_statistics(&self) -> Result<EncodingStatistics> {
        Ok(self.encoder.statistics(&self.grid)?)
    }
}

/// Outcome of one board in a batch run
#[derive(Debug)]
pub struct BatchResult {
    pub name: String,
    pub result: Result<Option<Solution>>,
}

/// Solve every `.txt` board in `dir` in parallel, results sorted by name.
/// Boards that fail to load are reported as errors, not skipped.
pub fn solve_batch<P: AsRef<Path>>(settings: &Settings, dir: P) -> Result<Vec<BatchResult>> {
    let entries = load_puzzle_files(&dir)?;
    info!("Solving {} boards from {}", entries.len(), dir.as_ref().display());

    Ok(entries
        .into_par_iter()
        .map(|(name, loaded)| {
            let result = loaded
                .and_then(|grid| MinesweeperProblem::with_grid(settings.clone(), grid))
                .and_then(|problem| problem.solve());
            BatchResult { name, result }
        })
        .collect())
}
