//! Varisat SAT solver integration

use super::constraints::Clause;
use super::solver::{Assignment, ClauseLedger, FormulaSolver, SolveOutcome, SolverStatistics};
use crate::config::SolverBackend;
use anyhow::{Context, Result};
use std::time::Instant;
use varisat::{ExtendFormula, Lit, Solver};

/// SAT solver wrapper for Varisat
pub struct VarisatSolver {
    solver: Solver<'static>,
    ledger: ClauseLedger,
}

impl VarisatSolver {
    pub fn new() -> Self {
        Self {
            solver: Solver::new(),
            ledger: ClauseLedger::new(),
        }
    }

    fn extract_assignment(&self) -> Result<Assignment> {
        let model = self
            .solver
            .model()
            .context("Varisat reported SAT without a model")?;

        let mut values = vec![false; self.ledger.variable_count + 1];
        for lit in model {
            let dimacs = lit.to_dimacs();
            let var = dimacs.unsigned_abs();
            if var < values.len() {
                values[var] = dimacs > 0;
            }
        }

        Ok(Assignment::from_fn(self.ledger.variable_count, |var| {
            values[var as usize]
        }))
    }
}

impl Default for VarisatSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FormulaSolver for VarisatSolver {
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
            let lits: Vec<Lit> = clause
                .literals
                .iter()
                .map(|&l| Lit::from_dimacs(l as isize))
                .collect();
            self.solver.add_clause(&lits);
        }
        Ok(())
    }

    fn solve(&mut self) -> Result<SolveOutcome> {
        let started = Instant::now();

        let outcome = if self.ledger.has_empty_clause {
            SolveOutcome::Unsatisfiable
        } else if self.solver.solve().context("Varisat solver failed")? {
            SolveOutcome::Satisfiable(self.extract_assignment()?)
        } else {
            SolveOutcome::Unsatisfiable
        };

        self.ledger.finish(started, &outcome);
        Ok(outcome)
    }

    fn statistics(&self) -> SolverStatistics {
        self.ledger.statistics()
    }

    fn backend(&self) -> SolverBackend {
        SolverBackend::Varisat
    }
}
