//! Implements a solver interface for Clarabel
//!
//! Problems are passed to Clarabel in its conic form `Ax + s = b`, `s ∈ K`. Equality constraints
//! and fixed variables go in the zero cone, finite variable and constraint bounds in the
//! nonnegative cone.
use indexmap::IndexMap;
use log::{debug, warn};
use nalgebra_sparse::{CooMatrix, CscMatrix};

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::variable::VariableType;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Interior point solver backed by Clarabel
#[derive(Clone, Debug)]
pub struct ClarabelSolver {
    tolerance: f64,
    verbose: bool,
}

impl ClarabelSolver {
    pub fn new(tolerance: f64) -> Self {
        ClarabelSolver {
            tolerance,
            verbose: false,
        }
    }

    /// Print Clarabel's iteration log
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// The constraint rows of a problem in Clarabel's conic form
struct ConicForm {
    a: CooMatrix<f64>,
    b: Vec<f64>,
    zero_rows: usize,
    nonnegative_rows: usize,
    /// Row of each equality constraint, for reading back the duals
    equality_rows: IndexMap<String, usize>,
}

impl ConicForm {
    fn from_problem(problem: &Problem) -> Self {
        let n = problem.num_variables();
        let variables = problem.variables();
        let column = |id: &str| variables[id].index();

        // Rows are collected first as (terms, rhs), since the row count is only known at the end
        let mut zero: Vec<(Vec<(usize, f64)>, f64)> = Vec::new();
        let mut nonnegative: Vec<(Vec<(usize, f64)>, f64)> = Vec::new();
        let mut equality_rows = IndexMap::new();

        for constraint in problem.constraints().values() {
            let terms: Vec<(usize, f64)> = constraint
                .get_terms()
                .iter()
                .map(|t| (column(&t.variable), t.coefficient))
                .collect();
            match constraint {
                Constraint::Equality { id, equals, .. } => {
                    equality_rows.insert(id.clone(), zero.len());
                    zero.push((terms, *equals));
                }
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => {
                    if upper_bound.is_finite() {
                        nonnegative.push((terms.clone(), *upper_bound));
                    }
                    if lower_bound.is_finite() {
                        let negated = terms.iter().map(|(c, v)| (*c, -v)).collect();
                        nonnegative.push((negated, -lower_bound));
                    }
                }
            }
        }

        for var in variables.values() {
            let col = var.index();
            if var.is_fixed() {
                zero.push((vec![(col, 1.)], var.lower_bound));
                continue;
            }
            if var.upper_bound.is_finite() {
                nonnegative.push((vec![(col, 1.)], var.upper_bound));
            }
            if var.lower_bound.is_finite() {
                nonnegative.push((vec![(col, -1.)], -var.lower_bound));
            }
        }

        let zero_rows = zero.len();
        let nonnegative_rows = nonnegative.len();
        let mut a = CooMatrix::new(zero_rows + nonnegative_rows, n);
        let mut b = Vec::with_capacity(zero_rows + nonnegative_rows);
        for (row, (terms, rhs)) in zero.into_iter().chain(nonnegative).enumerate() {
            for (col, coef) in terms {
                a.push(row, col, coef);
            }
            b.push(rhs);
        }
        ConicForm {
            a,
            b,
            zero_rows,
            nonnegative_rows,
            equality_rows,
        }
    }
}

/// Convert a sparse matrix into Clarabel's own compressed column type
fn to_clarabel_csc(coo: &CooMatrix<f64>) -> clarabel::algebra::CscMatrix<f64> {
    let (m, n) = (coo.nrows(), coo.ncols());
    let (colptr, rowval, nzval) = CscMatrix::from(coo).disassemble();
    clarabel::algebra::CscMatrix::new(m, n, colptr, rowval, nzval)
}

impl Solver for ClarabelSolver {
    fn integer_variable_capable(&self) -> bool {
        false
    }

    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        use clarabel::solver::*;

        if let Some(var) = problem
            .variables()
            .values()
            .find(|v| v.variable_type != VariableType::Continuous)
        {
            return Err(SolverError::UnsupportedVariableType(
                var.variable_type.to_string(),
            ));
        }

        let n = problem.num_variables();
        let sign = match problem.objective().sense() {
            ObjectiveSense::Minimize => 1.,
            ObjectiveSense::Maximize => -1.,
        };
        let mut objective = vec![0f64; n];
        for term in problem.objective().terms() {
            objective[problem.variables()[term.variable.as_str()].index()] += term.coefficient;
        }
        let q: Vec<f64> = objective.iter().map(|c| sign * c).collect();
        let p = clarabel::algebra::CscMatrix::<f64>::zeros((n, n));

        let conic = ConicForm::from_problem(problem);
        let a = to_clarabel_csc(&conic.a);
        let mut cones = Vec::new();
        if conic.zero_rows > 0 {
            cones.push(SupportedConeT::ZeroConeT(conic.zero_rows));
        }
        if conic.nonnegative_rows > 0 {
            cones.push(SupportedConeT::NonnegativeConeT(conic.nonnegative_rows));
        }

        let settings = DefaultSettingsBuilder::default()
            .verbose(self.verbose)
            .tol_feas(self.tolerance)
            .build()
            .map_err(|e| SolverError::InvalidSettings(e.to_string()))?;

        debug!(
            "Solving problem with {} variables, {} zero cone rows and {} nonnegative rows",
            n, conic.zero_rows, conic.nonnegative_rows
        );
        let mut solver = DefaultSolver::new(&p, &q, &a, &conic.b, &cones, settings);
        solver.solve();

        let status = match solver.solution.status {
            SolverStatus::Solved => OptimizationStatus::Optimal,
            SolverStatus::AlmostSolved => OptimizationStatus::AlmostOptimal,
            SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
                OptimizationStatus::Infeasible
            }
            SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => {
                OptimizationStatus::Unbounded
            }
            SolverStatus::MaxIterations | SolverStatus::MaxTime => {
                OptimizationStatus::SolverHalted
            }
            other => return Err(SolverError::NumericalFailure(format!("{:?}", other))),
        };
        if !status.has_values() {
            warn!("Clarabel finished with status {:?}", solver.solution.status);
            return Ok(ProblemSolution::degenerate(status));
        }

        let x = &solver.solution.x;
        let objective_value = objective.iter().zip(x).map(|(c, v)| c * v).sum();
        let variable_values = problem
            .variables()
            .iter()
            .map(|(id, var)| (id.clone(), x[var.index()]))
            .collect();
        // Clarabel minimizes, flip the duals back for maximization problems
        let dual_values = conic
            .equality_rows
            .iter()
            .map(|(id, row)| (id.clone(), sign * solver.solution.z[*row]))
            .collect();
        Ok(ProblemSolution {
            status,
            objective_value: Some(objective_value),
            variable_values: Some(variable_values),
            dual_values: Some(dual_values),
        })
    }
}
