//! Factory for creating SAT solver instances based on configuration

use super::constraints::Clause;
use super::solver::{FormulaSolver, SatSolver, SolveOutcome, SolverStatistics};
use super::varisat_solver::VarisatSolver;
use crate::config::SolverBackend;
use anyhow::Result;

/// Unified SAT solver interface that can use different backends
pub enum UnifiedSatSolver {
    Cadical(SatSolver),
    Varisat(VarisatSolver),
}

impl UnifiedSatSolver {
    /// Create a new solver instance based on the specified backend
    pub fn new(backend: SolverBackend) -> Self {
        match backend {
            SolverBackend::Cadical => UnifiedSatSolver::Cadical(SatSolver::new()),
            SolverBackend::Varisat => UnifiedSatSolver::Varisat(VarisatSolver::new()),
        }
    }

    fn inner(&mut self) -> &mut dyn FormulaSolver {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver,
            UnifiedSatSolver::Varisat(solver) => solver,
        }
    }
}

impl FormulaSolver for UnifiedSatSolver {
    fn reset(&mut self) -> Result<()> {
        self.inner().reset()
    }

    fn declare_variables(&mut self, count: usize) {
        self.inner().declare_variables(count)
    }

    fn add_clause(&mut self, clause: &Clause) -> Result<()> {
        self.inner().add_clause(clause)
    }

    fn solve(&mut self) -> Result<SolveOutcome> {
        self.inner().solve()
    }

    fn statistics(&self) -> SolverStatistics {
        match self {
            UnifiedSatSolver::Cadical(solver) => solver.statistics(),
            UnifiedSatSolver::Varisat(solver) => solver.statistics(),
        }
    }

    fn backend(&self) -> SolverBackend {
        match self {
            UnifiedSatSolver::Cadical(_) => SolverBackend::Cadical,
            UnifiedSatSolver::Varisat(_) => SolverBackend::Varisat,
        }
    }
}

impl Default for UnifiedSatSolver {
    fn default() -> Self {
        UnifiedSatSolver::new(SolverBackend::Cadical)
    }
}
