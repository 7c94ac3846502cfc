//! Resolution of the exchange reactions carrying a given element
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::metabolic_model::model::Model;

/// Exchange reactions whose metabolite contains an element, with how many atoms of it a unit of
/// flux carries out of the system
///
/// For the usual `met <=>` orientation this is just the atom count of the metabolite, so a
/// negative flux times the factor is the number of atoms taken up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CarbonExchanges {
    element: String,
    atoms: IndexMap<String, f64>,
}

impl CarbonExchanges {
    pub fn new(element: &str, atoms: IndexMap<String, f64>) -> Self {
        CarbonExchanges {
            element: element.to_string(),
            atoms,
        }
    }

    /// Element the exchanges were selected for
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Atoms moved out of the system per unit flux through `reaction_id`
    pub fn atoms(&self, reaction_id: &str) -> Option<f64> {
        self.atoms.get(reaction_id).copied()
    }

    pub fn contains(&self, reaction_id: &str) -> bool {
        self.atoms.contains_key(reaction_id)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Reaction ids in model order
    pub fn reaction_ids(&self) -> impl Iterator<Item = &str> {
        self.atoms.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.atoms.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Find the exchange reactions whose metabolite contains at least one atom of `element`
///
/// Metabolites whose formula can't be parsed are skipped with a warning.
pub fn atom_exchange_metabolites(model: &Model, element: &str) -> CarbonExchanges {
    let mut atoms = IndexMap::new();
    for reaction in model.exchanges() {
        let Some((met_id, coef)) = reaction.metabolites.first() else {
            continue;
        };
        let Some(metabolite) = model.metabolites.get(met_id) else {
            continue;
        };
        let count = match metabolite.elements() {
            Ok(elements) => elements.get(element).copied().unwrap_or(0.),
            Err(err) => {
                warn!("Skipping exchange {}: {}", reaction.id, err);
                continue;
            }
        };
        if count > 0. {
            atoms.insert(reaction.id.clone(), -coef * count);
        }
    }
    CarbonExchanges::new(element, atoms)
}

/// Exchange reactions carrying carbon
pub fn carbon_exchange_reactions(model: &Model) -> CarbonExchanges {
    atom_exchange_metabolites(model, "C")
}
