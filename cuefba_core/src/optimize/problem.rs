//! Provides struct representing an optimization problem
use crate::optimize::constraint::Constraint;
use crate::optimize::objective::{Objective, ObjectiveSense, ObjectiveTerm};
use crate::optimize::variable::{Variable, VariableBuilder, VariableType};
use indexmap::IndexMap;
use thiserror::Error;

/// An optimization problem
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize
    objective: Objective,
    /// Variables of the optimization problem
    variables: IndexMap<String, Variable>,
    /// Constraints of the optimization problem
    constraints: IndexMap<String, Constraint>,
    /// Type of problem
    problem_type: ProblemType,
}

impl Problem {
    // region Creation Functions
    /// Create a new optimization problem
    pub fn new(objective_sense: ObjectiveSense) -> Self {
        Self {
            objective: Objective::new(objective_sense),
            variables: IndexMap::new(),
            constraints: IndexMap::new(),
            problem_type: ProblemType::LinearContinuous,
        }
    }

    /// Create a new maximization problem
    pub fn new_maximization() -> Self {
        Self::new(ObjectiveSense::Maximize)
    }

    /// Create a new minimization problem
    pub fn new_minimization() -> Self {
        Self::new(ObjectiveSense::Minimize)
    }
    // endregion Creation Functions

    // region Accessors
    /// Variables of the problem, in column order
    pub fn variables(&self) -> &IndexMap<String, Variable> {
        &self.variables
    }

    /// Constraints of the problem, in insertion order
    pub fn constraints(&self) -> &IndexMap<String, Constraint> {
        &self.constraints
    }

    /// Objective of the problem
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Type of the problem
    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    /// Number of variables in the problem
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints in the problem
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
    // endregion Accessors

    /// Update the objective sense of the problem
    pub fn update_objective_sense(&mut self, sense: ObjectiveSense) {
        self.objective.set_sense(sense);
    }

    // region Adding Variables
    /// Add a variable to the optimization problem
    pub fn add_variable(&mut self, mut variable: Variable) -> Result<(), ProblemError> {
        self.validate_variable(&variable)?;
        variable.index = self.variables.len();
        if variable.variable_type != VariableType::Continuous {
            self.problem_type = ProblemType::LinearMixedInteger;
        }
        self.variables.insert(variable.id.clone(), variable);
        Ok(())
    }

    /// Create a new variable and add it to the optimization problem
    pub fn add_new_variable(
        &mut self,
        id: &str,
        name: Option<&str>,
        variable_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        let mut builder = VariableBuilder::default();
        builder
            .id(id)
            .variable_type(variable_type)
            .lower_bound(lower_bound)
            .upper_bound(upper_bound);
        if let Some(name) = name {
            builder.name(name);
        }
        let new_var = builder
            .build()
            .map_err(|e| ProblemError::InvalidVariable(e.to_string()))?;
        self.add_variable(new_var)
    }
    // endregion Adding Variables

    // region Adding Constraints
    /// Add a constraint to the problem
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), ProblemError> {
        self.validate_constraint(&constraint)?;
        self.constraints
            .insert(constraint.get_id().to_string(), constraint);
        Ok(())
    }

    /// Create a new equality constraint and add it to the problem
    pub fn add_new_equality_constraint(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        equals: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(Constraint::new_equality(
            id,
            variables,
            coefficients,
            equals,
        ))
    }

    /// Create a new inequality constraint and add it to the problem
    pub fn add_new_inequality_constraint(
        &mut self,
        id: &str,
        variables: &[&str],
        coefficients: &[f64],
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        self.add_constraint(Constraint::new_inequality(
            id,
            variables,
            coefficients,
            lower_bound,
            upper_bound,
        ))
    }
    // endregion Adding Constraints

    // region Adding Objective Terms
    /// Add a new term to the objective
    pub fn add_objective_term(&mut self, objective_term: ObjectiveTerm) -> Result<(), ProblemError> {
        if !self.variables.contains_key(&objective_term.variable) {
            return Err(ProblemError::NonExistentVariablesInObjective);
        }
        self.objective.add_term(objective_term);
        Ok(())
    }

    /// Add a new linear term to the objective using the variable id
    pub fn add_new_linear_objective_term(
        &mut self,
        variable_id: &str,
        coefficient: f64,
    ) -> Result<(), ProblemError> {
        self.add_objective_term(ObjectiveTerm::new_linear(variable_id, coefficient))
    }
    // endregion Adding Objective Terms

    /// Update the bounds of a variable
    pub fn update_variable_bounds(
        &mut self,
        id: &str,
        lower_bound: f64,
        upper_bound: f64,
    ) -> Result<(), ProblemError> {
        if lower_bound > upper_bound {
            return Err(ProblemError::InvalidVariableBounds {
                id: id.to_string(),
                lower_bound,
                upper_bound,
            });
        }
        match self.variables.get_mut(id) {
            Some(var) => {
                var.lower_bound = lower_bound;
                var.upper_bound = upper_bound;
            }
            None => return Err(ProblemError::NonExistentVariable),
        };
        Ok(())
    }

    // region Removal
    /// Remove a variable from the problem, will also remove it as a term from all constraints
    /// and any terms in the objective that include this variable
    pub fn delete_variable(&mut self, variable_id: &str) -> Result<(), ProblemError> {
        if self.variables.shift_remove(variable_id).is_none() {
            return Err(ProblemError::NonExistentVariable);
        }
        self.objective.remove_terms_with_variable(variable_id);
        self.constraints
            .values_mut()
            .for_each(|cons| cons.remove_variable(variable_id));
        self.fix_variable_indices();
        self.fix_problem_type();
        Ok(())
    }
    // endregion Removal

    // region Validation Functions
    /// Check that a variable to be added is valid to add to this problem
    fn validate_variable(&self, variable: &Variable) -> Result<(), ProblemError> {
        if self.variables.contains_key(&variable.id) {
            return Err(ProblemError::VariableIdAlreadyExists);
        };
        // NaN bounds fail this comparison as well
        if !(variable.lower_bound <= variable.upper_bound) {
            return Err(ProblemError::InvalidVariableBounds {
                id: variable.id.clone(),
                lower_bound: variable.lower_bound,
                upper_bound: variable.upper_bound,
            });
        }
        Ok(())
    }

    /// Check that a constraint to be added is valid to add to this Problem
    fn validate_constraint(&self, constraint: &Constraint) -> Result<(), ProblemError> {
        if self.constraints.contains_key(constraint.get_id()) {
            return Err(ProblemError::ConstraintAlreadyExists);
        }
        if let Constraint::Inequality {
            lower_bound,
            upper_bound,
            ..
        } = constraint
        {
            if lower_bound > upper_bound {
                return Err(ProblemError::InvalidConstraintBounds);
            }
        }
        if constraint
            .get_variables()
            .any(|var| !self.variables.contains_key(var))
        {
            return Err(ProblemError::NonExistentVariablesInConstraint);
        }
        Ok(())
    }
    // endregion Validation Functions

    // region Fix Problem Functions
    fn fix_variable_indices(&mut self) {
        self.variables
            .values_mut()
            .enumerate()
            .for_each(|(ind, var)| var.index = ind);
    }

    fn fix_problem_type(&mut self) {
        self.problem_type = if self.has_integer_variables() {
            ProblemType::LinearMixedInteger
        } else {
            ProblemType::LinearContinuous
        };
    }
    // endregion Fix Problem Functions

    /// Whether any variable is integer or binary
    pub fn has_integer_variables(&self) -> bool {
        self.variables
            .values()
            .any(|var| var.variable_type != VariableType::Continuous)
    }
}

/// Types of optimization problems
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemType {
    /// Problem with linear objectives and constraints, and continuous variables
    LinearContinuous,
    /// Problem with linear objective and constraints, with integer and continuous variables
    LinearMixedInteger,
}

/// Errors associated with the Problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// Error when trying to add a variable with the same id as an existing variable
    #[error("Tried to add a variable with the same id as an existing variable")]
    VariableIdAlreadyExists,
    /// Error when trying to add variable with invalid bounds
    #[error("Variable {id} has lower_bound {lower_bound} > upper_bound {upper_bound}")]
    InvalidVariableBounds {
        id: String,
        lower_bound: f64,
        upper_bound: f64,
    },
    /// Error when a variable could not be built
    #[error("Unable to build variable: {0}")]
    InvalidVariable(String),
    /// Error when trying to add a constraint with the same id as an existing constraint
    #[error("Tried to add a constraint with the same id as an existing constraint")]
    ConstraintAlreadyExists,
    /// Error when trying to add a constraint with invalid bounds
    #[error("Tried to add an inequality constraint with lower_bound > upper_bound")]
    InvalidConstraintBounds,
    /// Error when trying to add a constraint that contains variables not in the model
    #[error("Tried to add a constraint with variables not in the model")]
    NonExistentVariablesInConstraint,
    /// Error when trying to add an objective term which includes variables not in the model
    #[error("Tried adding an objective term with variables not in the model")]
    NonExistentVariablesInObjective,
    /// Error when trying to perform an update or drop on a variable that doesn't exist
    #[error("Tried to access a variable that doesn't exist")]
    NonExistentVariable,
}
