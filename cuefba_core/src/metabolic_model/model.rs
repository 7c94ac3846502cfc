//! This module provides the Model struct for representing an entire metabolic model
use indexmap::IndexMap;
use log::{debug, warn};
use nalgebra_sparse::{CooMatrix, CscMatrix};
use thiserror::Error;

use crate::configuration::{self, SolverKind};
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;
use crate::metabolic_model::solution::Solution;
use crate::optimize::problem::{Problem, ProblemError};
use crate::optimize::solvers::{solver_for, Solver, SolverError};
use crate::optimize::variable::VariableType;

/// Represents a Genome Scale Metabolic Model
///
/// Cloning a model gives a fully independent copy, which is how callers take a snapshot before
/// mutating bounds or the medium.
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of metabolite ids to Metabolite Objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
    /// Solver used by [`Model::optimize`]
    pub solver: SolverKind,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
            solver: configuration::current().solver,
        }
    }

    // region Building
    /// Add a reaction to the model
    ///
    /// # Examples
    /// ```rust
    /// use cuefba_core::metabolic_model::model::Model;
    /// use cuefba_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction").build().unwrap();
    /// model.add_reaction(new_reaction);
    /// assert!(model.reaction("new_reaction").is_some());
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a metabolite to the model
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }
    // endregion Building

    // region Reaction access
    pub fn reaction(&self, id: &str) -> Option<&Reaction> {
        self.reactions.get(id)
    }

    pub fn reaction_mut(&mut self, id: &str) -> Option<&mut Reaction> {
        self.reactions.get_mut(id)
    }

    /// Set the bounds of a reaction
    ///
    /// The bounds are not checked here, an inverted pair surfaces when the model is optimized.
    pub fn set_bounds(&mut self, id: &str, lower_bound: f64, upper_bound: f64) -> Result<(), ModelError> {
        let reaction = self
            .reaction_mut(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))?;
        reaction.set_bounds(lower_bound, upper_bound);
        Ok(())
    }

    /// Set only the lower bound of a reaction
    pub fn set_lower_bound(&mut self, id: &str, lower_bound: f64) -> Result<(), ModelError> {
        let reaction = self
            .reaction_mut(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))?;
        reaction.lower_bound = lower_bound;
        Ok(())
    }
    // endregion Reaction access

    // region Boundary
    /// Reactions with a single metabolite (exchanges, demands and sinks)
    pub fn boundary(&self) -> Vec<&Reaction> {
        self.reactions.values().filter(|r| r.is_boundary()).collect()
    }

    /// Compartment of the metabolite of a boundary reaction
    fn boundary_compartment(&self, reaction: &Reaction) -> Option<&str> {
        reaction
            .metabolites
            .keys()
            .next()
            .and_then(|met| self.metabolites.get(met))
            .and_then(|met| met.compartment.as_deref())
    }

    /// Find the compartment representing the outside of the cell
    ///
    /// This is `e` if present, otherwise a compartment whose long name mentions
    /// "extracellular", otherwise the compartment holding the most boundary metabolites.
    pub fn external_compartment(&self) -> Option<String> {
        let has_e = self
            .compartments
            .as_ref()
            .is_some_and(|c| c.contains_key("e"))
            || self
                .metabolites
                .values()
                .any(|m| m.compartment.as_deref() == Some("e"));
        if has_e {
            return Some("e".to_string());
        }
        if let Some(compartments) = &self.compartments {
            if let Some((id, _)) = compartments
                .iter()
                .find(|(_, name)| name.to_lowercase().contains("extracellular"))
            {
                return Some(id.clone());
            }
        }
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for reaction in self.boundary() {
            if let Some(compartment) = self.boundary_compartment(reaction) {
                *counts.entry(compartment).or_insert(0) += 1;
            }
        }
        counts
            .into_iter()
            .max_by_key(|(_, count)| *count)
            .map(|(id, _)| id.to_string())
    }

    /// Boundary reactions whose metabolite is in the external compartment
    pub fn exchanges(&self) -> Vec<&Reaction> {
        let external = match self.external_compartment() {
            Some(external) => external,
            None => return Vec::new(),
        };
        self.boundary()
            .into_iter()
            .filter(|r| self.boundary_compartment(r) == Some(external.as_str()))
            .collect()
    }

    /// Current growth medium, a map of exchange reaction id to maximal uptake
    ///
    /// Only exchanges which currently allow uptake are included.
    pub fn medium(&self) -> IndexMap<String, f64> {
        self.exchanges()
            .into_iter()
            .filter_map(|r| {
                let uptake = if exchange_consumes(r) {
                    -r.lower_bound
                } else {
                    r.upper_bound
                };
                (uptake > 0.).then(|| (r.id.clone(), uptake))
            })
            .collect()
    }

    /// Replace the growth medium
    ///
    /// Every exchange listed in `medium` gets its uptake bound set, every other exchange is closed
    /// for uptake.
    pub fn set_medium(&mut self, medium: &IndexMap<String, f64>) -> Result<(), ModelError> {
        let exchanges: Vec<String> = self.exchanges().iter().map(|r| r.id.clone()).collect();
        if let Some(unknown) = medium.keys().find(|id| !exchanges.contains(id)) {
            return Err(ModelError::NotAnExchange(unknown.clone()));
        }
        for id in exchanges {
            let uptake = medium.get(&id).copied().unwrap_or(0.);
            self.set_medium_component(&id, uptake)?;
        }
        Ok(())
    }

    /// Set the maximal uptake of a single medium component
    ///
    /// The value is not validated, as in `medium[id] = uptake` on the medium map. When the new
    /// uptake bound crosses the opposite bound, that bound is moved to it as well, fixing the
    /// exchange flux.
    pub fn set_medium_component(&mut self, id: &str, uptake: f64) -> Result<(), ModelError> {
        let reaction = self
            .reactions
            .get_mut(id)
            .ok_or_else(|| ModelError::ReactionNotFound(id.to_string()))?;
        if !reaction.is_boundary() {
            return Err(ModelError::NotAnExchange(id.to_string()));
        }
        if exchange_consumes(reaction) {
            if reaction.upper_bound < -uptake {
                warn!(
                    "Uptake {} of {} crosses its upper bound {}, fixing the flux to {}",
                    uptake, id, reaction.upper_bound, -uptake
                );
                reaction.upper_bound = -uptake;
            }
            reaction.lower_bound = -uptake;
        } else if reaction.products().next().is_some() {
            if reaction.lower_bound > uptake {
                warn!(
                    "Uptake {} of {} crosses its lower bound {}, fixing the flux to {}",
                    uptake, id, reaction.lower_bound, uptake
                );
                reaction.lower_bound = uptake;
            }
            reaction.upper_bound = uptake;
        }
        Ok(())
    }
    // endregion Boundary

    // region Optimization
    /// Stoichiometric matrix with metabolites as rows and reactions as columns, both in model order
    pub fn stoichiometric_matrix(&self) -> CscMatrix<f64> {
        let mut coo = CooMatrix::new(self.metabolites.len(), self.reactions.len());
        for (col, reaction) in self.reactions.values().enumerate() {
            for (met, coef) in &reaction.metabolites {
                if let Some(row) = self.metabolites.get_index_of(met) {
                    coo.push(row, col, *coef);
                }
            }
        }
        CscMatrix::from(&coo)
    }

    /// Build the flux balance analysis problem for the current state of the model
    ///
    /// Every reaction is split into a forward and a reverse variable, each metabolite gets a
    /// steady state mass balance, and the objective is maximized.
    pub fn build_problem(&self) -> Result<Problem, ProblemError> {
        let mut problem = Problem::new_maximization();
        let mut balances: IndexMap<&str, Vec<(String, f64)>> = IndexMap::new();
        for met in self.metabolites.keys() {
            balances.insert(met.as_str(), Vec::new());
        }
        for reaction in self.reactions.values() {
            let forward = reaction.get_forward_id();
            let reverse = reaction.get_reverse_id();
            problem.add_new_variable(
                &forward,
                reaction.name.as_deref(),
                VariableType::Continuous,
                reaction.get_forward_lower_bound(),
                reaction.get_forward_upper_bound(),
            )?;
            problem.add_new_variable(
                &reverse,
                None,
                VariableType::Continuous,
                reaction.get_reverse_lower_bound(),
                reaction.get_reverse_upper_bound(),
            )?;
            for (met, coef) in &reaction.metabolites {
                let terms = balances.entry(met.as_str()).or_default();
                terms.push((forward.clone(), *coef));
                terms.push((reverse.clone(), -coef));
            }
        }
        for (met, terms) in balances {
            if terms.is_empty() {
                continue;
            }
            let variables: Vec<&str> = terms.iter().map(|(v, _)| v.as_str()).collect();
            let coefficients: Vec<f64> = terms.iter().map(|(_, c)| *c).collect();
            problem.add_new_equality_constraint(met, &variables, &coefficients, 0.)?;
        }
        for (id, coef) in &self.objective {
            let reaction = self
                .reactions
                .get(id)
                .ok_or(ProblemError::NonExistentVariablesInObjective)?;
            problem.add_new_linear_objective_term(&reaction.get_forward_id(), *coef)?;
            problem.add_new_linear_objective_term(&reaction.get_reverse_id(), -coef)?;
        }
        Ok(problem)
    }

    /// Optimize the model with flux balance analysis using the model's solver
    ///
    /// Infeasible or unbounded models are not errors, they give a [`Solution`] with that status
    /// and no fluxes.
    pub fn optimize(&self) -> Result<Solution, SolverError> {
        let tolerance = configuration::current().tolerance;
        let mut solver = solver_for(self.solver, tolerance);
        self.optimize_with(solver.as_mut())
    }

    /// Optimize the model with flux balance analysis using the given solver
    pub fn optimize_with(&self, solver: &mut dyn Solver) -> Result<Solution, SolverError> {
        let problem = self.build_problem()?;
        let result = solver.solve(&problem)?;
        if !result.status.has_values() {
            warn!(
                "Optimization of model {} finished with status {:?}",
                self.id.as_deref().unwrap_or("<unnamed>"),
                result.status
            );
            return Ok(Solution::degenerate(result.status));
        }
        let values = result.variable_values.unwrap_or_default();
        let value = |id: &str| values.get(id).copied().unwrap_or(f64::NAN);
        let fluxes = self
            .reactions
            .values()
            .map(|r| {
                (
                    r.id.clone(),
                    value(&r.get_forward_id()) - value(&r.get_reverse_id()),
                )
            })
            .collect();
        debug!("Objective value {:?}", result.objective_value);
        Ok(Solution::new(result.status, result.objective_value, Some(fluxes)))
    }

    /// Optimize and only return the objective value, NaN if the problem could not be solved
    pub fn slim_optimize(&self) -> Result<f64, SolverError> {
        Ok(self.optimize()?.objective_value().unwrap_or(f64::NAN))
    }
    // endregion Optimization
}

/// Whether the exchange is written so that uptake is negative flux (`met <=>`)
fn exchange_consumes(reaction: &Reaction) -> bool {
    reaction.reactants().next().is_some()
}

/// Errors when editing a model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Reaction {0} is not in the model")]
    ReactionNotFound(String),
    #[error("Reaction {0} is not an exchange reaction")]
    NotAnExchange(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::metabolite::MetaboliteBuilder;
    use crate::metabolic_model::reaction::ReactionBuilder;
    use crate::optimize::OptimizationStatus;

    fn metabolite(id: &str, compartment: &str, formula: &str) -> Metabolite {
        MetaboliteBuilder::default()
            .id(id)
            .compartment(Some(compartment.to_string()))
            .formula(Some(formula.to_string()))
            .build()
            .unwrap()
    }

    fn reaction(id: &str, metabolites: &[(&str, f64)], lb: f64, ub: f64) -> Reaction {
        ReactionBuilder::default()
            .id(id)
            .metabolites(metabolites.iter().map(|(m, c)| (m.to_string(), *c)).collect())
            .lower_bound(lb)
            .upper_bound(ub)
            .build()
            .unwrap()
    }

    /// A -> B chain with an uptake exchange, a secretion exchange and a product-side exchange
    fn chain_model() -> Model {
        let mut model = Model::new_empty();
        model.add_metabolite(metabolite("a_e", "e", "C2H4"));
        model.add_metabolite(metabolite("a_c", "c", "C2H4"));
        model.add_metabolite(metabolite("b_e", "e", "C2H4"));
        model.add_metabolite(metabolite("b_c", "c", "C2H4"));
        model.add_reaction(reaction("EX_a_e", &[("a_e", -1.)], -5., 1000.));
        model.add_reaction(reaction("EX_b_e", &[("b_e", 1.)], -1000., 0.));
        model.add_reaction(reaction("At", &[("a_e", -1.), ("a_c", 1.)], -1000., 1000.));
        model.add_reaction(reaction("AB", &[("a_c", -1.), ("b_c", 1.)], 0., 1000.));
        model.add_reaction(reaction("Bt", &[("b_c", -1.), ("b_e", 1.)], 0., 1000.));
        model.add_reaction(reaction("DM_b_c", &[("b_c", -1.)], 0., 1000.));
        model.objective.insert("DM_b_c".to_string(), 1.);
        model
    }

    #[test]
    fn exchanges_and_boundary() {
        let model = chain_model();
        assert_eq!(model.external_compartment().as_deref(), Some("e"));
        let boundary: Vec<&str> = model.boundary().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(boundary, vec!["EX_a_e", "EX_b_e", "DM_b_c"]);
        let exchanges: Vec<&str> = model.exchanges().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(exchanges, vec!["EX_a_e", "EX_b_e"]);
    }

    #[test]
    fn medium_get_and_set() {
        let mut model = chain_model();
        let medium = model.medium();
        assert_eq!(medium.len(), 1);
        assert!((medium["EX_a_e"] - 5.).abs() < 1e-25);

        model.set_medium_component("EX_a_e", 12.).unwrap();
        assert!((model.reaction("EX_a_e").unwrap().lower_bound + 12.).abs() < 1e-25);

        // Product side exchange opens through its upper bound
        model.set_medium_component("EX_b_e", 3.).unwrap();
        assert!((model.reaction("EX_b_e").unwrap().upper_bound - 3.).abs() < 1e-25);
        assert!((model.medium()["EX_b_e"] - 3.).abs() < 1e-25);

        // Setting the whole medium closes what is not listed
        let mut new_medium = IndexMap::new();
        new_medium.insert("EX_b_e".to_string(), 2.);
        model.set_medium(&new_medium).unwrap();
        assert!((model.reaction("EX_a_e").unwrap().lower_bound - 0.).abs() < 1e-25);
        assert_eq!(model.medium().keys().collect::<Vec<_>>(), vec!["EX_b_e"]);

        assert_eq!(
            model.set_medium_component("AB", 1.),
            Err(ModelError::NotAnExchange("AB".to_string()))
        );
        assert_eq!(
            model.set_medium_component("EX_z_e", 1.),
            Err(ModelError::ReactionNotFound("EX_z_e".to_string()))
        );
    }

    #[test]
    fn uptake_crossing_bound_fixes_flux() {
        let mut model = chain_model();
        // Forced uptake of at least 5
        model.set_bounds("EX_a_e", -10., -5.).unwrap();
        model.set_medium_component("EX_a_e", 2.).unwrap();
        let reaction = model.reaction("EX_a_e").unwrap();
        assert!((reaction.lower_bound + 2.).abs() < 1e-25);
        assert!((reaction.upper_bound + 2.).abs() < 1e-25);

        // Product side exchange with a lower bound above the new uptake
        model.set_bounds("EX_b_e", 4., 10.).unwrap();
        model.set_medium_component("EX_b_e", 1.).unwrap();
        let reaction = model.reaction("EX_b_e").unwrap();
        assert!((reaction.lower_bound - 1.).abs() < 1e-25);
        assert!((reaction.upper_bound - 1.).abs() < 1e-25);
    }

    #[test]
    fn zero_uptake_closes_exchange() {
        let mut model = chain_model();
        model.set_medium_component("EX_a_e", 0.).unwrap();
        assert_eq!(model.reaction("EX_a_e").unwrap().lower_bound, 0.);
        assert!(model.medium().is_empty());
    }

    #[test]
    fn stoichiometric_matrix_shape() {
        let model = chain_model();
        let s = model.stoichiometric_matrix();
        assert_eq!(s.nrows(), 4);
        assert_eq!(s.ncols(), 6);
        assert_eq!(s.nnz(), 9);
    }

    #[test]
    fn build_problem_splits_reactions() {
        let model = chain_model();
        let problem = model.build_problem().unwrap();
        assert_eq!(problem.num_variables(), 12);
        assert_eq!(problem.num_constraints(), 4);
        let ex = model.reaction("EX_a_e").unwrap();
        let reverse = &problem.variables()[ex.get_reverse_id().as_str()];
        assert!((reverse.upper_bound - 5.).abs() < 1e-25);
    }

    #[test]
    fn optimize_chain() {
        let model = chain_model();
        let solution = model.optimize().unwrap();
        assert_eq!(solution.status(), OptimizationStatus::Optimal);
        assert!((solution.objective_value().unwrap() - 5.).abs() < 1e-4);
        assert!((solution.flux("EX_a_e") + 5.).abs() < 1e-4);
        assert!((solution.flux("DM_b_c") - 5.).abs() < 1e-4);
        assert!((model.slim_optimize().unwrap() - 5.).abs() < 1e-4);
    }

    #[test]
    fn inverted_bounds_fail_to_optimize() {
        let mut model = chain_model();
        model.set_bounds("AB", 10., 5.).unwrap();
        assert!(matches!(
            model.optimize(),
            Err(SolverError::Problem(ProblemError::InvalidVariableBounds { .. }))
        ));
    }

    #[test]
    fn infeasible_model_gives_degenerate_solution() {
        let mut model = chain_model();
        // Force more product out than substrate can come in
        model.set_lower_bound("DM_b_c", 50.).unwrap();
        let solution = model.optimize().unwrap();
        assert_eq!(solution.status(), OptimizationStatus::Infeasible);
        assert!(solution.flux("DM_b_c").is_nan());
        assert!(model.slim_optimize().unwrap().is_nan());
    }

    #[test]
    fn clone_is_independent() {
        let base = chain_model();
        let mut copy = base.clone();
        copy.set_medium_component("EX_a_e", 100.).unwrap();
        assert!((base.reaction("EX_a_e").unwrap().lower_bound + 5.).abs() < 1e-25);
    }
}
