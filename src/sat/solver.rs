//! Solver interface and the CaDiCaL backend
//!
//! The encoder never searches for models itself. Anything implementing
//! [`FormulaSolver`] can take a [`Formula`] and report either a satisfying
//! [`Assignment`] or that none exists.

use super::constraints::Clause;
use super::encoder::Formula;
use super::variables::{Literal, Variable};
use crate::config::SolverBackend;
use anyhow::Result;
use cadical::Solver;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// A model as signed literals; a positive literal means the cell is a mine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    literals: Vec<Literal>,
}

impl Assignment {
    pub fn from_literals(literals: Vec<Literal>) -> Self {
        Self { literals }
    }

    /// Build a dense assignment for `1..=num_variables` from a value lookup
    pub fn from_fn(num_variables: usize, value: impl Fn(Variable) -> bool) -> Self {
        let last = Variable::try_from(num_variables).unwrap_or(Variable::MAX);
        let literals = (1..=last)
            .map(|var| if value(var) { var } else { -var })
            .collect();
        Self { literals }
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn len(&self) -> usize {
        self.literals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Truth value of `var`, or `None` if the assignment doesn't mention it.
    ///
    /// Solvers report variables in order, so `var` normally sits at index
    /// `var - 1`; other layouts fall back to a scan.
    pub fn value(&self, var: Variable) -> Option<bool> {
        if var < 1 {
            return None;
        }
        if let Some(&lit) = self.literals.get((var - 1) as usize) {
            if lit.abs() == var {
                return Some(lit > 0);
            }
        }
        self.literals.iter().find(|l| l.abs() == var).map(|&l| l > 0)
    }

    /// Clause excluding this assignment restricted to `projection`
    pub fn blocking_clause(&self, projection: &[Variable]) -> Clause {
        Clause::new(
            projection
                .iter()
                .map(|&var| if self.value(var) == Some(true) { -var } else { var })
                .collect(),
        )
    }
}

/// Result of handing a formula to a solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Satisfiable(Assignment),
    Unsatisfiable,
}

impl SolveOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SolveOutcome::Satisfiable(_))
    }

    pub fn into_assignment(self) -> Option<Assignment> {
        match self {
            SolveOutcome::Satisfiable(assignment) => Some(assignment),
            SolveOutcome::Unsatisfiable => None,
        }
    }
}

/// A SAT backend.
///
/// Implementors provide incremental clause loading and a single solve; the
/// provided methods build whole-formula solving and model enumeration on top.
pub trait FormulaSolver {
    /// Drop all clauses and start over
    fn reset(&mut self) -> Result<()>;

    /// Make sure models cover at least `1..=count`
    fn declare_variables(&mut self, count: usize);

    /// Add a single clause to the solver
    fn add_clause(&mut self, clause: &Clause) -> Result<()>;

    /// Solve the clauses added so far
    fn solve(&mut self) -> Result<SolveOutcome>;

    fn statistics(&self) -> SolverStatistics;

    fn backend(&self) -> SolverBackend;

    /// Add clauses to the solver
    fn add_clauses(&mut self, clauses: &[Clause]) -> Result<()> {
        for clause in clauses {
            self.add_clause(clause)?;
        }
        Ok(())
    }

    /// Load `formula` into a fresh solver state and solve it
    fn solve_formula(&mut self, formula: &Formula) -> Result<SolveOutcome> {
        self.reset()?;
        self.declare_variables(formula.num_variables);
        self.add_clauses(&formula.clauses)?;
        self.solve()
    }

    /// Up to `max_solutions` models of `formula` that differ on `projection`
    fn solve_multiple(
        &mut self,
        formula: &Formula,
        max_solutions: usize,
        projection: &[Variable],
    ) -> Result<Vec<Assignment>> {
        let mut solutions = Vec::new();
        if max_solutions == 0 {
            return Ok(solutions);
        }

        let mut outcome = self.solve_formula(formula)?;
        while let SolveOutcome::Satisfiable(assignment) = outcome {
            // Add blocking clause to prevent finding the same solution again
            let blocking = assignment.blocking_clause(projection);
            solutions.push(assignment);
            if solutions.len() >= max_solutions {
                break;
            }
            self.add_clause(&blocking)?;
            outcome = self.solve()?;
        }

        debug!("Enumerated {} solution(s) with {:?}", solutions.len(), self.backend());
        Ok(solutions)
    }
}

/// Statistics about the solving process
#[derive(Debug, Clone)]
pub struct SolverStatistics {
    pub variable_count: usize,
    pub clause_count: usize,
    pub solve_time: Duration,
    pub result: SolverResultType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverResultType {
    NotSolved,
    Satisfiable,
    Unsatisfiable,
}

impl SolverStatistics {
    fn empty() -> Self {
        Self {
            variable_count: 0,
            clause_count: 0,
            solve_time: Duration::ZERO,
            result: SolverResultType::NotSolved,
        }
    }
}

/// Bookkeeping shared by the bundled backends
#[derive(Debug, Clone)]
pub(crate) struct ClauseLedger {
    pub variable_count: usize,
    pub clause_count: usize,
    pub has_empty_clause: bool,
    pub last_solve_time: Duration,
    pub last_result: SolverResultType,
}

impl ClauseLedger {
    pub fn new() -> Self {
        Self {
            variable_count: 0,
            clause_count: 0,
            has_empty_clause: false,
            last_solve_time: Duration::ZERO,
            last_result: SolverResultType::NotSolved,
        }
    }

    /// Record `clause`; returns false if it is empty and must not reach the backend
    pub fn record(&mut self, clause: &Clause) -> bool {
        self.clause_count += 1;
        if clause.is_empty() {
            trace!("empty clause recorded, formula is unsatisfiable");
            self.has_empty_clause = true;
            return false;
        }
        for &literal in &clause.literals {
            let var = literal.unsigned_abs() as usize;
            if var > self.variable_count {
                self.variable_count = var;
            }
        }
        true
    }

    pub fn finish(&mut self, started: Instant, outcome: &SolveOutcome) {
        self.last_solve_time = started.elapsed();
        self.last_result = if outcome.is_satisfiable() {
            SolverResultType::Satisfiable
        } else {
            SolverResultType::Unsatisfiable
        };
    }

    pub fn statistics(&self) -> SolverStatistics {
        SolverStatistics {
            variable_count: self.variable_count,
            clause_count: self.clause_count,
            solve_time: self.last_solve_time,
            result: self.last_result,
        }
    }
}

/// SAT solver wrapper for CaDiCaL
pub struct SatSolver {
    solver: Solver,
    ledger: ClauseLedger,
}

impl SatSolver {
    /// Create a new SAT solver instance
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            ledger: ClauseLedger::new(),
        }
    }

    /// Get the number of variables
    pub fn variable_count(&self) -> usize {
        self.ledger.variable_count
    }

    /// Get the number of clauses
    pub fn clause_count(&self) -> usize {
        self.ledger.clause_count
    }

    /// Extract variable assignment from the solver.
    /// Variables CaDiCaL never saw are reported false.
    fn extract_assignment(&self) -> Assignment {
        let known = self.solver.max_variable();
        Assignment::from_fn(self.ledger.variable_count, |var| {
            var <= known && self.solver.value(var) == Some(true)
        })
    }
}

impl Default for SatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaSolver for SatSolver {
    fn reset(&mut self) -> Result<()> {
        self.solver = Solver::new();
        self.ledger = ClauseLedger::new();
        Ok(())
    }

    fn declare_variables(&mut self, count: usize) {
        self.ledger.variable_count = self.ledger.variable_count.max(count);
    }

    fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        if self.ledger.record(clause) {
            self.solver.add_clause(clause.literals.iter().copied());
        }
        Ok(())
    }

    fn solve(&mut self) -> Result<SolveOutcome> {
        let started = Instant::now();

        let outcome = if self.ledger.has_empty_clause {
            SolveOutcome::Unsatisfiable
        } else {
            match self.solver.solve() {
                Some(true) => SolveOutcome::Satisfiable(self.extract_assignment()),
                Some(false) => SolveOutcome::Unsatisfiable,
                None => anyhow::bail!("CaDiCaL stopped without deciding the formula"),
            }
        };

        self.ledger.finish(started, &outcome);
        Ok(outcome)
    }

    fn statistics(&self) -> SolverStatistics {
        self.ledger.statistics()
    }

    fn backend(&self) -> SolverBackend {
        SolverBackend::Cadical
    }
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SAT Solver Statistics:")?;
        writeln!(f, "  Variables: {}", self.variable_count)?;
        writeln!(f, "  Clauses: {}", self.clause_count)?;
        writeln!(f, "  Solve time: {:.3}s", self.solve_time.as_secs_f64())?;
        writeln!(f, "  Result: {:?}", self.result)?;
        Ok(())
    }
}

impl Default for SolverStatistics {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_creation() {
        let solver = SatSolver::new();
        assert_eq!(solver.variable_count(), 0);
        assert_eq!(solver.clause_count(), 0);
        assert_eq!(solver.statistics().result, SolverResultType::NotSolved);
    }

    #[test]
    fn test_simple_satisfiable() {
        let mut solver = SatSolver::new();

        // x1 ∨ x2, ¬x1 ∨ x2
        solver.add_clause(&Clause::new(vec![1, 2])).unwrap();
        solver.add_clause(&Clause::new(vec![-1, 2])).unwrap();

        let assignment = solver.solve().unwrap().into_assignment().unwrap();
        assert_eq!(assignment.value(2), Some(true));
        assert_eq!(assignment.len(), 2);
        assert_eq!(solver.statistics().result, SolverResultType::Satisfiable);
    }

    #[test]
    fn test_unsatisfiable() {
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::unit(1)).unwrap();
        solver.add_clause(&Clause::unit(-1)).unwrap();

        assert_eq!(solver.solve().unwrap(), SolveOutcome::Unsatisfiable);
    }

    #[test]
    fn test_empty_clause_is_unsatisfiable() {
        let mut solver = SatSolver::new();
        solver.add_clause(&Clause::unit(1)).unwrap();
        solver.add_clause(&Clause::empty()).unwrap();

        assert_eq!(solver.solve().unwrap(), SolveOutcome::Unsatisfiable);
        assert_eq!(solver.clause_count(), 2);
    }

    #[test]
    fn test_declared_variables_are_reported() {
        let formula = Formula::new(5, vec![Clause::unit(2)]);
        let mut solver = SatSolver::new();

        let assignment = solver.solve_formula(&formula).unwrap().into_assignment().unwrap();
        assert_eq!(assignment.len(), 5);
        assert_eq!(assignment.value(2), Some(true));
        // never mentioned in a clause, reported as not a mine
        assert_eq!(assignment.value(5), Some(false));
    }

    #[test]
    fn test_multiple_solutions() {
        // x1 ∨ x2 has three models over {1, 2}
        let formula = Formula::new(2, vec![Clause::new(vec![1, 2])]);
        let mut solver = SatSolver::new();

        let solutions = solver.solve_multiple(&formula, 10, &[1, 2]).unwrap();
        assert_eq!(solutions.len(), 3);
        for solution in &solutions {
            assert!(solution.value(1) == Some(true) || solution.value(2) == Some(true));
        }

        let capped = solver.solve_multiple(&formula, 2, &[1, 2]).unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn test_projection_limits_enumeration() {
        // x2 is free, but only x1 matters
        let formula = Formula::new(2, vec![Clause::unit(1)]);
        let mut solver = SatSolver::new();

        assert_eq!(solver.solve_multiple(&formula, 10, &[1]).unwrap().len(), 1);
        assert_eq!(solver.solve_multiple(&formula, 10, &[]).unwrap().len(), 1);
    }

    #[test]
    fn test_variable_count_tracking() {
        let mut solver = SatSolver::new();

        solver.add_clause(&Clause::new(vec![1, -5, 3])).unwrap();
        assert_eq!(solver.variable_count(), 5);

        solver.add_clause(&Clause::new(vec![2, -7])).unwrap();
        assert_eq!(solver.variable_count(), 7);
    }

    #[test]
    fn test_assignment_lookup() {
        let ordered = Assignment::from_literals(vec![-1, 2, -3]);
        assert_eq!(ordered.value(2), Some(true));
        assert_eq!(ordered.value(3), Some(false));
        assert_eq!(ordered.value(4), None);
        assert_eq!(ordered.value(0), None);

        let shuffled = Assignment::from_literals(vec![3, -1]);
        assert_eq!(shuffled.value(3), Some(true));
        assert_eq!(shuffled.value(1), Some(false));
        assert_eq!(shuffled.value(2), None);

        assert_eq!(ordered.blocking_clause(&[1, 2]), Clause::new(vec![1, -2]));
    }
}
