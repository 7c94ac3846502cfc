//! Module providing JSON IO for cuefba Models
//!
//! The format is the COBRA JSON schema written by cobrapy and served by BiGG.
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::configuration;
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Reaction, ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model, used for reading and writing models in json format
#[derive(Serialize, Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    id: Option<String>,
    compartments: Option<IndexMap<String, String>>,
    version: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    charge: Option<i32>,
    formula: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    #[serde(default)]
    gene_reaction_rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    objective_coefficient: Option<f64>,
    subsystem: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}
// endregion JSON Model

// region Conversions
/// Notes and annotations are kept as their JSON text
fn value_to_string(value: Option<Value>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn string_to_value(text: &Option<String>) -> Option<Value> {
    text.as_ref()
        .map(|t| serde_json::from_str(t).unwrap_or_else(|_| Value::String(t.clone())))
}

impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge.unwrap_or_default(),
            formula: m.formula,
            notes: value_to_string(m.notes),
            annotation: value_to_string(m.annotation),
        }
    }
}

impl From<&Metabolite> for JsonMetabolite {
    fn from(m: &Metabolite) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            compartment: m.compartment.clone(),
            charge: Some(m.charge),
            formula: m.formula.clone(),
            notes: string_to_value(&m.notes),
            annotation: string_to_value(&m.annotation),
        }
    }
}

impl Model {
    /// Read a model from a COBRA JSON file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = fs::read_to_string(path)?;
        Model::from_json_str(&model_str)
    }

    /// Parse a model from COBRA JSON text
    pub fn from_json_str(json: &str) -> Result<Model, JsonError> {
        let json_model = serde_json::from_str::<JsonModel>(json)?;
        Model::from_json(json_model)
    }

    /// Write the model as COBRA JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<(), JsonError> {
        let model_string = serde_json::to_string(&self.to_json())?;
        fs::write(path, model_string)?;
        Ok(())
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut reactions: IndexMap<String, Reaction> = IndexMap::new();
        let mut metabolites: IndexMap<String, Metabolite> = IndexMap::new();
        let mut objective: IndexMap<String, f64> = IndexMap::new();
        json_model.metabolites.into_iter().for_each(|m| {
            metabolites.insert(m.id.clone(), Metabolite::from(m));
        });
        for rxn in json_model.reactions {
            let gene_reaction_rule =
                (!rxn.gene_reaction_rule.is_empty()).then_some(rxn.gene_reaction_rule);
            let new_reaction = ReactionBuilder::default()
                .id(rxn.id.clone())
                .metabolites(rxn.metabolites)
                .name(rxn.name)
                .gene_reaction_rule(gene_reaction_rule)
                .lower_bound(rxn.lower_bound)
                .upper_bound(rxn.upper_bound)
                .subsystem(rxn.subsystem)
                .notes(value_to_string(rxn.notes))
                .annotation(value_to_string(rxn.annotation))
                .build()?;
            reactions.insert(rxn.id.clone(), new_reaction);
            if let Some(coef) = rxn.objective_coefficient {
                if coef != 0. {
                    objective.insert(rxn.id, coef);
                }
            }
        }
        Ok(Model {
            reactions,
            metabolites,
            objective,
            id: json_model.id,
            compartments: json_model.compartments,
            version: json_model.version,
            solver: configuration::current().solver,
        })
    }

    fn to_json(&self) -> JsonModel {
        let metabolites = self.metabolites.values().map(JsonMetabolite::from).collect();
        let reactions = self
            .reactions
            .values()
            .map(|r| JsonReaction {
                id: r.id.clone(),
                name: r.name.clone(),
                metabolites: r.metabolites.clone(),
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                gene_reaction_rule: r.gene_reaction_rule.clone().unwrap_or_default(),
                objective_coefficient: self.objective.get(&r.id).copied(),
                subsystem: r.subsystem.clone(),
                notes: string_to_value(&r.notes),
                annotation: string_to_value(&r.annotation),
            })
            .collect();
        JsonModel {
            metabolites,
            reactions,
            id: self.id.clone(),
            compartments: self.compartments.clone(),
            version: self.version.clone(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Serde json parse error: {0}")]
    SerdeJsonParseError(#[from] serde_json::Error),
    #[error("Unable to read or write file: {0}")]
    Io(#[from] std::io::Error),
}
// endregion Conversions
