//! Formula assembly: every cell's clauses merged into one CNF instance

use super::constraints::{Clause, ClauseSynthesizer, DirectEncoding};
use super::variables::{variable_count, Variable};
use crate::board::Grid;
use crate::error::Result;
use log::debug;
use std::collections::BTreeSet;
use std::fmt;

/// A CNF formula over the variables `1..=num_variables`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub num_variables: usize,
    pub clauses: Vec<Clause>,
}

impl Formula {
    pub fn new(num_variables: usize, clauses: Vec<Clause>) -> Self {
        Self { num_variables, clauses }
    }

    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }

    /// An empty clause makes the whole formula unsatisfiable
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// Variables that occur in at least one clause
    pub fn constrained_variables(&self) -> BTreeSet<Variable> {
        self.clauses
            .iter()
            .flat_map(|c| c.literals.iter().map(|l| l.abs()))
            .collect()
    }

    /// Whether every clause holds under `model` (true = mine)
    pub fn is_satisfied_by(&self, model: impl Fn(Variable) -> bool) -> bool {
        self.clauses.iter().all(|c| c.is_satisfied_by(&model))
    }

    /// DIMACS CNF text, for handing the formula to an external solver
    pub fn to_dimacs(&self) -> String {
        let mut out = format!("p cnf {} {}\n", self.num_variables, self.clauses.len());
        for clause in &self.clauses {
            for lit in &clause.literals {
                out.push_str(&format!("{} ", lit));
            }
            out.push_str("0\n");
        }
        out
    }
}

/// Builds a [`Formula`] from a board using a [`ClauseSynthesizer`]
pub struct SatEncoder<S: ClauseSynthesizer = DirectEncoding> {
    synthesizer: S,
}

impl SatEncoder<DirectEncoding> {
    pub fn new() -> Self {
        Self { synthesizer: DirectEncoding }
    }
}

impl Default for SatEncoder<DirectEncoding> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ClauseSynthesizer> SatEncoder<S> {
    pub fn with_synthesizer(synthesizer: S) -> Self {
        Self { synthesizer }
    }

    /// Validate `grid`, then concatenate the clauses of every cell in
    /// row-major order. Duplicate clauses are kept.
    pub fn build_formula(&self, grid: &Grid) -> Result<Formula> {
        grid.validate_puzzle()?;

        let size = grid.size();
        let clauses: Vec<Clause> = size
            .positions()
            .flat_map(|pos| self.synthesizer.clauses_for_cell(grid, pos))
            .collect();

        debug!(
            "Encoded {}x{} board into {} clauses over {} variables",
            grid.rows,
            grid.cols,
            clauses.len(),
            variable_count(size)
        );

        Ok(Formula::new(variable_count(size), clauses))
    }

    /// Encode `grid` and summarise the result
    pub fn statistics(&self, grid: &Grid) -> Result<EncodingStatistics> {
        let formula = self.build_formula(grid)?;

        Ok(EncodingStatistics {
            grid_rows: grid.rows,
            grid_cols: grid.cols,
            unknown_cells: grid.unknown_count(),
            hint_cells: grid.hint_count(),
            total_variables: formula.num_variables,
            constrained_variables: formula.constrained_variables().len(),
            total_clauses: formula.clause_count(),
            longest_clause: formula.clauses.iter().map(Clause::len).max().unwrap_or(0),
            trivially_unsatisfiable: formula.has_empty_clause(),
        })
    }
}

/// Encode `grid` with the direct combinatorial encoding
pub fn build_formula(grid: &Grid) -> Result<Formula> {
    SatEncoder::new().build_formula(grid)
}

/// Statistics about the SAT encoding
#[derive(Debug, Clone)]
pub struct EncodingStatistics {
    pub grid_rows: usize,
    pub grid_cols: usize,
    pub unknown_cells: usize,
    pub hint_cells: usize,
    pub total_variables: usize,
    pub constrained_variables: usize,
    pub total_clauses: usize,
    pub longest_clause: usize,
    pub trivially_unsatisfiable: bool,
}

impl fmt::Display for EncodingStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SAT Encoding Statistics:")?;
        writeln!(f, "  Grid: {}x{}", self.grid_rows, self.grid_cols)?;
        writeln!(f, "  Unknown cells: {}", self.unknown_cells)?;
        writeln!(f, "  Hint cells: {}", self.hint_cells)?;
        writeln!(f, "  Total variables: {}", self.total_variables)?;
        writeln!(f, "  Constrained variables: {}", self.constrained_variables)?;
        writeln!(f, "  Total clauses: {}", self.total_clauses)?;
        writeln!(f, "  Longest clause: {}", self.longest_clause)?;
        if self.trivially_unsatisfiable {
            writeln!(f, "  Contains an impossible hint (formula is unsatisfiable)")?;
        }
        Ok(())
    }
}
