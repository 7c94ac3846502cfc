//! This module provides a struct for representing reactions
use crate::configuration::CONFIGURATION;
use crate::utils::hashing::short_hex_hash;
use derive_builder::Builder;
use indexmap::IndexMap;

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Used to identify the reaction
    #[builder(setter(into))]
    pub id: String,
    /// Metabolite stoichiometry of the reaction, negative coefficients are consumed
    #[builder(default = "IndexMap::new()")]
    pub metabolites: IndexMap<String, f64>,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Gene reaction rule, kept verbatim
    #[builder(default = "None")]
    pub gene_reaction_rule: Option<String>,
    /// Lower flux bound
    #[builder(default = "default_lower_bound()")]
    pub lower_bound: f64,
    /// Upper flux bound
    #[builder(default = "default_upper_bound()")]
    pub upper_bound: f64,
    /// Reaction subsystem
    #[builder(default = "None")]
    pub subsystem: Option<String>,
    /// Notes about the reaction
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Reaction Annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

fn default_lower_bound() -> f64 {
    CONFIGURATION
        .read()
        .map(|c| c.lower_bound)
        .unwrap_or(-1000.)
}

fn default_upper_bound() -> f64 {
    CONFIGURATION.read().map(|c| c.upper_bound).unwrap_or(1000.)
}

impl Reaction {
    /// Determine the id to be associated with the forward reaction in the optimization problem
    ///
    /// # Note:
    /// The forward id is "{reaction_id}_forward"
    pub fn get_forward_id(&self) -> String {
        format!("{}_forward", &self.id)
    }

    /// Determine the id to be associated with the reverse reaction in the optimization problem
    ///
    /// # Note:
    /// The reverse id is "{reaction_id}_reverse_{first five hex digits of hash of reaction_id}"
    pub fn get_reverse_id(&self) -> String {
        format!("{}_reverse_{}", &self.id, short_hex_hash(self.id.as_str()))
    }

    /// Upper bound of the variable associated with the forward reaction
    pub(crate) fn get_forward_upper_bound(&self) -> f64 {
        self.upper_bound.max(0.)
    }

    /// Lower bound of the variable associated with the forward reaction
    pub(crate) fn get_forward_lower_bound(&self) -> f64 {
        self.lower_bound.max(0.)
    }

    /// Upper bound of the variable associated with the reverse reaction
    pub(crate) fn get_reverse_upper_bound(&self) -> f64 {
        (-self.lower_bound).max(0.)
    }

    /// Lower bound of the variable associated with the reverse reaction
    pub(crate) fn get_reverse_lower_bound(&self) -> f64 {
        (-self.upper_bound).max(0.)
    }

    /// Set both flux bounds
    pub fn set_bounds(&mut self, lower_bound: f64, upper_bound: f64) {
        self.lower_bound = lower_bound;
        self.upper_bound = upper_bound;
    }

    /// A boundary reaction has a single metabolite, so it moves that metabolite in or out of the
    /// system (exchanges, demands and sinks)
    pub fn is_boundary(&self) -> bool {
        self.metabolites.len() == 1
    }

    /// Reaction can run backwards
    pub fn is_reversible(&self) -> bool {
        self.lower_bound < 0.
    }

    /// Metabolites consumed by the reaction
    pub fn reactants(&self) -> impl Iterator<Item = &str> {
        self.metabolites
            .iter()
            .filter(|(_, coef)| **coef < 0.)
            .map(|(id, _)| id.as_str())
    }

    /// Metabolites produced by the reaction
    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.metabolites
            .iter()
            .filter(|(_, coef)| **coef > 0.)
            .map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(lb: f64, ub: f64) -> Reaction {
        ReactionBuilder::default()
            .id("EX_glc__D_e")
            .lower_bound(lb)
            .upper_bound(ub)
            .build()
            .unwrap()
    }

    #[test]
    fn split_bounds_reversible() {
        let rxn = reaction(-10., 1000.);
        assert!((rxn.get_forward_lower_bound() - 0.).abs() < 1e-25);
        assert!((rxn.get_forward_upper_bound() - 1000.).abs() < 1e-25);
        assert!((rxn.get_reverse_lower_bound() - 0.).abs() < 1e-25);
        assert!((rxn.get_reverse_upper_bound() - 10.).abs() < 1e-25);
        assert!(rxn.is_reversible());
    }

    #[test]
    fn split_bounds_forced_forward() {
        // ATP maintenance style reaction with a positive lower bound
        let rxn = reaction(8.39, 1000.);
        assert!((rxn.get_forward_lower_bound() - 8.39).abs() < 1e-25);
        assert!((rxn.get_reverse_upper_bound() - 0.).abs() < 1e-25);
    }

    #[test]
    fn split_bounds_forced_reverse() {
        let rxn = reaction(-5., -2.);
        assert!((rxn.get_forward_upper_bound() - 0.).abs() < 1e-25);
        assert!((rxn.get_reverse_lower_bound() - 2.).abs() < 1e-25);
        assert!((rxn.get_reverse_upper_bound() - 5.).abs() < 1e-25);
    }

    #[test]
    fn ids() {
        let rxn = reaction(0., 1.);
        assert_eq!(rxn.get_forward_id(), "EX_glc__D_e_forward");
        assert!(rxn.get_reverse_id().starts_with("EX_glc__D_e_reverse_"));
        assert_ne!(rxn.get_forward_id(), rxn.get_reverse_id());
    }

    #[test]
    fn reactants_and_products() {
        let mut metabolites = IndexMap::new();
        metabolites.insert("glc__D_c".to_string(), -1.);
        metabolites.insert("adp_c".to_string(), -20.);
        metabolites.insert("co2_c".to_string(), 6.);
        metabolites.insert("atp_c".to_string(), 20.);
        let rxn = ReactionBuilder::default()
            .id("RESP")
            .metabolites(metabolites)
            .build()
            .unwrap();
        assert_eq!(rxn.reactants().collect::<Vec<_>>(), vec!["glc__D_c", "adp_c"]);
        assert_eq!(rxn.products().collect::<Vec<_>>(), vec!["co2_c", "atp_c"]);
    }

    #[test]
    fn default_bounds_from_configuration() {
        let rxn = ReactionBuilder::default().id("R").build().unwrap();
        assert!((rxn.lower_bound + 1000.).abs() < 1e-25);
        assert!((rxn.upper_bound - 1000.).abs() < 1e-25);
    }
}
