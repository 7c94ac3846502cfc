//! Reaction level result of optimizing a [`Model`](crate::metabolic_model::model::Model)
use indexmap::IndexMap;

use crate::optimize::OptimizationStatus;

/// Solution of a flux balance analysis
///
/// Created by [`Model::optimize`](crate::metabolic_model::model::Model::optimize), it is a
/// snapshot of the model state at call time and does not change afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    status: OptimizationStatus,
    objective_value: Option<f64>,
    fluxes: Option<IndexMap<String, f64>>,
}

impl Solution {
    pub(crate) fn new(
        status: OptimizationStatus,
        objective_value: Option<f64>,
        fluxes: Option<IndexMap<String, f64>>,
    ) -> Self {
        Solution {
            status,
            objective_value,
            fluxes,
        }
    }

    /// Build a solution directly from reaction fluxes
    pub fn from_fluxes(objective_value: f64, fluxes: IndexMap<String, f64>) -> Self {
        Solution::new(
            OptimizationStatus::Optimal,
            Some(objective_value),
            Some(fluxes),
        )
    }

    /// A solution with no values, as produced for infeasible or unbounded problems
    pub fn degenerate(status: OptimizationStatus) -> Self {
        Solution::new(status, None, None)
    }

    pub fn status(&self) -> OptimizationStatus {
        self.status
    }

    /// Objective value, `None` unless the problem was solved
    pub fn objective_value(&self) -> Option<f64> {
        self.objective_value
    }

    /// Net flux (forward minus reverse) through every reaction, `None` unless solved
    pub fn fluxes(&self) -> Option<&IndexMap<String, f64>> {
        self.fluxes.as_ref()
    }

    /// Net flux through one reaction, NaN when the solution holds no value for it
    pub fn flux(&self, reaction_id: &str) -> f64 {
        self.fluxes
            .as_ref()
            .and_then(|f| f.get(reaction_id).copied())
            .unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_fluxes_are_nan() {
        let solution = Solution::degenerate(OptimizationStatus::Infeasible);
        assert!(solution.flux("EX_glc__D_e").is_nan());
        assert!(solution.objective_value().is_none());
    }

    #[test]
    fn flux_lookup() {
        let mut fluxes = IndexMap::new();
        fluxes.insert("EX_glc__D_e".to_string(), -10.);
        let solution = Solution::from_fluxes(0.87, fluxes);
        assert!((solution.flux("EX_glc__D_e") + 10.).abs() < 1e-25);
        assert!(solution.flux("missing").is_nan());
    }
}
