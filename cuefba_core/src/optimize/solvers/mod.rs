//! Solver interfaces for [`Problem`]s
use crate::configuration::SolverKind;
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::ProblemSolution;
use thiserror::Error;

pub mod clarabel;

cfg_if::cfg_if! {
    if #[cfg(feature = "microlp")] {
        pub mod microlp;
    }
}

/// A backend able to solve an optimization [`Problem`]
pub trait Solver {
    /// Whether the solver can handle integer and binary variables
    fn integer_variable_capable(&self) -> bool;

    /// Solve the problem
    ///
    /// Infeasible and unbounded problems are reported through the status of the returned
    /// [`ProblemSolution`], an `Err` means the solver itself failed.
    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError>;
}

/// Create the solver selected by `kind`
pub fn solver_for(kind: SolverKind, tolerance: f64) -> Box<dyn Solver> {
    match kind {
        SolverKind::Clarabel => Box::new(clarabel::ClarabelSolver::new(tolerance)),
        #[cfg(feature = "microlp")]
        SolverKind::Microlp => Box::new(microlp::MicrolpSolver::new()),
    }
}

/// Errors raised while building or solving a problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Problem could not be built: {0}")]
    Problem(#[from] ProblemError),
    #[error("Solver does not support {0} variables")]
    UnsupportedVariableType(String),
    #[error("Invalid solver settings: {0}")]
    InvalidSettings(String),
    #[error("Numerical failure in the solver, status {0}")]
    NumericalFailure(String),
}
