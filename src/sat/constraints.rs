//! Clause synthesis for hint cells
//!
//! A hint `h` with `m` unknown neighbours becomes "exactly h of these m cells
//! are mines", written as two clause families:
//!
//! * at most `h`: every (h+1)-subset contains a safe cell, one clause of
//!   negated literals per subset;
//! * at least `h`: every (m-h+1)-subset contains a mine, one clause of
//!   positive literals per subset.

use super::combinations::combinations;
use super::variables::{to_variable, Literal, Variable};
use crate::board::{Cell, Grid, Position};
use log::debug;
use serde::{Deserialize, Serialize};

/// Represents a SAT clause (disjunction of literals)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    pub literals: Vec<Literal>, // Positive for variable, negative for negation
}

impl Clause {
    /// Create a new clause from literals
    pub fn new(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    /// Create a unit clause (single literal)
    pub fn unit(literal: Literal) -> Self {
        Self { literals: vec![literal] }
    }

    /// The clause with no literals; unsatisfiable on its own
    pub fn empty() -> Self {
        Self { literals: Vec::new() }
    }

    /// Check if clause is empty (unsatisfiable)
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether `model` (true = mine) satisfies this clause
    pub fn is_satisfied_by(&self, model: impl Fn(Variable) -> bool) -> bool {
        self.literals
            .iter()
            .any(|&lit| model(lit.abs()) == (lit > 0))
    }
}

/// Turns one board cell into the clauses that constrain its neighbours.
///
/// The formula assembler only depends on this trait, so a more compact
/// cardinality encoding can replace [`DirectEncoding`].
pub trait ClauseSynthesizer {
    fn clauses_for_cell(&self, grid: &Grid, pos: Position) -> Vec<Clause>;
}

/// Subset-based "exactly N" encoding, `C(m, h+1) + C(m, m-h+1)` clauses per hint
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectEncoding;

impl DirectEncoding {
    /// Variables of the unknown neighbours of `pos`, in neighbourhood scan order
    pub fn neighbor_variables(grid: &Grid, pos: Position) -> Vec<Variable> {
        let size = grid.size();
        grid.unknown_neighbors(pos)
            .into_iter()
            .map(|p| to_variable(p, size))
            .collect()
    }
}

impl ClauseSynthesizer for DirectEncoding {
    fn clauses_for_cell(&self, grid: &Grid, pos: Position) -> Vec<Clause> {
        let hint = match grid.get(pos) {
            Some(Cell::Hint(h)) => h as usize,
            _ => return Vec::new(),
        };

        let neighbor_vars = Self::neighbor_variables(grid, pos);
        let m = neighbor_vars.len();

        if hint > m {
            debug!("hint {} at {} has only {} unknown neighbours", hint, pos, m);
            return vec![Clause::empty()];
        }

        let select = |comb: Vec<usize>, sign: Literal| -> Clause {
            Clause::new(comb.into_iter().map(|i| sign * neighbor_vars[i - 1]).collect())
        };

        let mut clauses: Vec<Clause> = combinations(m, hint + 1)
            .into_iter()
            .map(|comb| select(comb, -1))
            .collect();

        clauses.extend(
            combinations(m, m - hint + 1)
                .into_iter()
                .map(|comb| select(comb, 1)),
        );

        clauses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::parse_grid_from_string;
    use crate::sat::combinations::binomial;

    #[test]
    fn test_clause_helpers() {
        let clause = Clause::new(vec![1, -2]);
        assert_eq!(clause.len(), 2);
        assert!(!clause.is_empty());
        assert!(Clause::empty().is_empty());
        assert_eq!(Clause::unit(-3).literals, vec![-3]);

        assert!(clause.is_satisfied_by(|v| v == 1));
        assert!(clause.is_satisfied_by(|_| false));
        assert!(!clause.is_satisfied_by(|v| v == 2));
        assert!(!Clause::empty().is_satisfied_by(|_| true));
    }

    #[test]
    fn test_hint_one_with_two_unknowns() {
        // 2x3 board: unknowns at variables 5 and 6, hint 1 at variable 2
        let grid = parse_grid_from_string("2 3\n0,1,0\n0,_,_\n").unwrap();
        let clauses = DirectEncoding.clauses_for_cell(&grid, Position::new(0, 1));

        assert_eq!(
            clauses,
            vec![Clause::new(vec![-5, -6]), Clause::new(vec![5, 6])]
        );
    }

    #[test]
    fn test_unknown_cell_emits_nothing() {
        let grid = parse_grid_from_string("1 2\n_,1\n").unwrap();
        assert!(DirectEncoding.clauses_for_cell(&grid, Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_zero_hint_forces_all_safe() {
        let grid = parse_grid_from_string("2 2\n0,_\n_,_\n").unwrap();
        let clauses = DirectEncoding.clauses_for_cell(&grid, Position::new(0, 0));

        assert_eq!(
            clauses,
            vec![Clause::unit(-2), Clause::unit(-3), Clause::unit(-4)]
        );
    }

    #[test]
    fn test_full_hint_forces_all_mines() {
        let grid = parse_grid_from_string("3 3\n_,_,_\n_,8,_\n_,_,_\n").unwrap();
        let clauses = DirectEncoding.clauses_for_cell(&grid, Position::new(1, 1));

        // at most 8 of 8 is vacuous, at least 8 of 8 is eight unit clauses
        assert_eq!(clauses.len(), 8);
        assert!(clauses.iter().all(|c| c.len() == 1 && c.literals[0] > 0));
    }

    #[test]
    fn test_clause_count_matches_binomials() {
        let grid = parse_grid_from_string("3 3\n_,_,_\n_,3,_\n_,_,_\n").unwrap();
        let clauses = DirectEncoding.clauses_for_cell(&grid, Position::new(1, 1));

        assert_eq!(clauses.len(), binomial(8, 4) + binomial(8, 6));
        let (negative, positive): (Vec<_>, Vec<_>) =
            clauses.iter().partition(|c| c.literals.iter().all(|&l| l < 0));
        assert_eq!(negative.len(), 70);
        assert!(negative.iter().all(|c| c.len() == 4));
        assert!(positive.iter().all(|c| c.len() == 6 && c.literals.iter().all(|&l| l > 0)));
    }

    #[test]
    fn test_impossible_hint_emits_empty_clause() {
        // one unknown neighbour cannot hold three mines
        let grid = parse_grid_from_string("1 2\n_,3\n").unwrap();
        let clauses = DirectEncoding.clauses_for_cell(&grid, Position::new(0, 1));
        assert_eq!(clauses, vec![Clause::empty()]);

        // no unknown neighbours at all
        let grid = parse_grid_from_string("1 2\n1,0\n").unwrap();
        let clauses = DirectEncoding.clauses_for_cell(&grid, Position::new(0, 0));
        assert_eq!(clauses, vec![Clause::empty()]);
    }
}
