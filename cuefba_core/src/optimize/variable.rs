//! Module providing representation of optimization problem variables
use std::fmt::{Display, Formatter};

use derive_builder::Builder;

/// A decision variable of an optimization problem
#[derive(Builder, Debug, Clone, PartialEq)]
pub struct Variable {
    /// Unique id of the variable within a problem
    #[builder(setter(into))]
    pub id: String,
    /// Optional human readable name
    #[builder(setter(into, strip_option), default = "None")]
    pub name: Option<String>,
    /// Type of the variable
    #[builder(default = "VariableType::Continuous")]
    pub variable_type: VariableType,
    /// Lowest value the variable can take
    #[builder(default = "f64::NEG_INFINITY")]
    pub lower_bound: f64,
    /// Highest value the variable can take
    #[builder(default = "f64::INFINITY")]
    pub upper_bound: f64,
    /// Column of the variable in the problem, assigned when it is added
    #[builder(default = "0")]
    pub(crate) index: usize,
}

impl Variable {
    /// Position of the variable in the problem's variable ordering
    pub fn index(&self) -> usize {
        self.index
    }

    /// True when the bounds pin the variable to a single value
    pub fn is_fixed(&self) -> bool {
        self.lower_bound == self.upper_bound
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}:{}", name, self.variable_type),
            None => write!(f, "{}:{}", self.id, self.variable_type),
        }
    }
}

/// Represents the type of variable in an optimization problem
///
/// # Notes:
/// Not all variable types are supported for all solvers, currently Clarabel only supports
/// Continuous variables
#[derive(Debug, PartialEq, Clone, Copy, Hash, Eq)]
pub enum VariableType {
    /// Continuous variable
    Continuous,
    /// Integer variable
    Integer,
    /// Binary Variable
    Binary,
}

impl Display for VariableType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableType::Continuous => write!(f, "CONTINUOUS"),
            VariableType::Integer => write!(f, "INTEGER"),
            VariableType::Binary => write!(f, "BINARY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let var = VariableBuilder::default().id("x").build().unwrap();
        assert_eq!(var.variable_type, VariableType::Continuous);
        assert!(var.lower_bound.is_infinite() && var.lower_bound < 0.);
        assert!(var.upper_bound.is_infinite() && var.upper_bound > 0.);
        assert_eq!(format!("{}", var), "x:CONTINUOUS");
    }

    #[test]
    fn display_uses_name() {
        let var = VariableBuilder::default()
            .id("PFK_forward")
            .name("Phosphofructokinase")
            .lower_bound(0.)
            .upper_bound(0.)
            .build()
            .unwrap();
        assert_eq!(format!("{}", var), "Phosphofructokinase:CONTINUOUS");
        assert!(var.is_fixed());
    }
}
