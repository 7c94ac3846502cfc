//! Implements a solver interface for microlp, a pure rust simplex solver
use indexmap::IndexMap;

use crate::optimize::constraint::Constraint;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::Problem;
use crate::optimize::solvers::{Solver, SolverError};
use crate::optimize::variable::VariableType;
use crate::optimize::{OptimizationStatus, ProblemSolution};

#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {}

impl MicrolpSolver {
    pub fn new() -> Self {
        MicrolpSolver {}
    }
}

impl Solver for MicrolpSolver {
    fn integer_variable_capable(&self) -> bool {
        true
    }

    fn solve(&mut self, problem: &Problem) -> Result<ProblemSolution, SolverError> {
        let direction = match problem.objective().sense() {
            ObjectiveSense::Minimize => microlp::OptimizationDirection::Minimize,
            ObjectiveSense::Maximize => microlp::OptimizationDirection::Maximize,
        };
        let mut coefficients: IndexMap<&str, f64> = IndexMap::new();
        for term in problem.objective().terms() {
            *coefficients.entry(term.variable.as_str()).or_insert(0.) += term.coefficient;
        }

        let mut lp = microlp::Problem::new(direction);
        let mut columns: IndexMap<&str, microlp::Variable> = IndexMap::new();
        for (id, var) in problem.variables() {
            let coef = coefficients.get(id.as_str()).copied().unwrap_or(0.);
            let column = match var.variable_type {
                VariableType::Continuous => {
                    lp.add_var(coef, (var.lower_bound, var.upper_bound))
                }
                VariableType::Integer => {
                    lp.add_integer_var(coef, (var.lower_bound as i32, var.upper_bound as i32))
                }
                VariableType::Binary => lp.add_binary_var(coef),
            };
            columns.insert(id.as_str(), column);
        }

        let expression = |constraint: &Constraint| {
            let mut expr = microlp::LinearExpr::empty();
            for t in constraint.get_terms() {
                expr.add(columns[t.variable.as_str()], t.coefficient);
            }
            expr
        };
        for constraint in problem.constraints().values() {
            match constraint {
                Constraint::Equality { equals, .. } => {
                    lp.add_constraint(expression(constraint), microlp::ComparisonOp::Eq, *equals)
                }
                Constraint::Inequality {
                    lower_bound,
                    upper_bound,
                    ..
                } => {
                    if upper_bound.is_finite() {
                        lp.add_constraint(
                            expression(constraint),
                            microlp::ComparisonOp::Le,
                            *upper_bound,
                        );
                    }
                    if lower_bound.is_finite() {
                        lp.add_constraint(
                            expression(constraint),
                            microlp::ComparisonOp::Ge,
                            *lower_bound,
                        );
                    }
                }
            }
        }

        let solution = match lp.solve() {
            Ok(solution) => solution,
            Err(microlp::Error::Infeasible) => {
                return Ok(ProblemSolution::degenerate(OptimizationStatus::Infeasible))
            }
            Err(microlp::Error::Unbounded) => {
                return Ok(ProblemSolution::degenerate(OptimizationStatus::Unbounded))
            }
            #[allow(unreachable_patterns)]
            Err(other) => return Err(SolverError::NumericalFailure(other.to_string())),
        };
        let variable_values = columns
            .iter()
            .map(|(id, column)| (id.to_string(), solution[*column]))
            .collect();
        Ok(ProblemSolution {
            status: OptimizationStatus::Optimal,
            objective_value: Some(solution.objective()),
            variable_values: Some(variable_values),
            dual_values: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_small_lp() {
        let mut problem = Problem::new_maximization();
        problem
            .add_new_variable("x", None, VariableType::Continuous, 0., 3.)
            .unwrap();
        problem
            .add_new_variable("y", None, VariableType::Continuous, 0., 3.)
            .unwrap();
        problem
            .add_new_inequality_constraint("cap", &["x", "y"], &[1., 1.], f64::NEG_INFINITY, 4.)
            .unwrap();
        problem.add_new_linear_objective_term("x", 1.).unwrap();
        problem.add_new_linear_objective_term("y", 2.).unwrap();
        let solution = MicrolpSolver::new().solve(&problem).unwrap();
        assert!((solution.objective_value.unwrap() - 7.).abs() < 1e-8);
        let values = solution.variable_values.unwrap();
        assert!((values["x"] - 1.).abs() < 1e-8);
        assert!((values["y"] - 3.).abs() < 1e-8);
    }
}
