//! This module provides the metabolite struct representing a metabolite

use std::hash::Hash;

use derive_builder::Builder;
use indexmap::IndexMap;

pub use crate::utils::formula::FormulaError;
use crate::utils::formula::parse_formula;

/// Represents a metabolite
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Metabolite {
    /// Used to identify the metabolite (must be unique)
    #[builder(setter(into))]
    pub id: String,
    /// Human Readable name of the metabolite
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Which compartment the metabolite is in
    #[builder(default = "None")]
    pub compartment: Option<String>,
    /// Electrical charge of the Metabolite
    #[builder(default = "0")]
    pub charge: i32,
    /// Chemical Formula of the metabolite
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Notes about the metabolite
    #[builder(default = "None")]
    pub notes: Option<String>,
    /// Metabolite annotations
    #[builder(default = "None")]
    pub annotation: Option<String>,
}

impl Hash for Metabolite {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        if let Some(ref compartment) = self.compartment {
            compartment.hash(state)
        };
    }
}

impl Metabolite {
    /// Element counts of the metabolite's formula, empty when there is no formula
    pub fn elements(&self) -> Result<IndexMap<String, f64>, FormulaError> {
        match &self.formula {
            Some(formula) => parse_formula(formula),
            None => Ok(IndexMap::new()),
        }
    }

    /// Number of atoms of `element` in the metabolite, 0 if absent or the formula is unreadable
    pub fn atom_count(&self, element: &str) -> f64 {
        self.elements()
            .ok()
            .and_then(|e| e.get(element).copied())
            .unwrap_or(0.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carbon_count() {
        let glc = MetaboliteBuilder::default()
            .id("glc__D_e")
            .compartment(Some("e".to_string()))
            .formula(Some("C6H12O6".to_string()))
            .build()
            .unwrap();
        assert!((glc.atom_count("C") - 6.).abs() < 1e-25);
        assert!((glc.atom_count("N") - 0.).abs() < 1e-25);

        let no_formula = MetaboliteBuilder::default().id("x").build().unwrap();
        assert!(no_formula.elements().unwrap().is_empty());
    }
}
