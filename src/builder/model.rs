// Model container: turns registry, objective and constraint groups into a
// solver-ready OptimizationProblem

use tracing::debug;

use super::error::{ModelError, Result};
use super::expression::LinearConstraint;
use super::objective::Objective;
use super::registry::{VariableId, VariableRegistry};
use crate::domain::{Constraint, ObjectiveFunction, OptimizationProblem, SolverConfig};

/// Constraints generated from one rule
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintGroup {
    pub name: String,
    pub constraints: Vec<LinearConstraint>,
}

/// Ordered collection of constraint groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    groups: Vec<ConstraintGroup>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(
        mut self,
        name: impl Into<String>,
        constraints: impl IntoIterator<Item = LinearConstraint>,
    ) -> Self {
        self.groups.push(ConstraintGroup {
            name: name.into(),
            constraints: constraints.into_iter().collect(),
        });
        self
    }

    pub fn group(&self, name: &str) -> Option<&ConstraintGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn groups(&self) -> &[ConstraintGroup] {
        &self.groups
    }

    /// Total number of constraints over all groups.
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.constraints.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assembles the final [`OptimizationProblem`]
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    description: String,
    registry: VariableRegistry,
    objective: Option<Objective>,
    constraints: ConstraintSet,
    config: SolverConfig,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>, registry: VariableRegistry) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            registry,
            objective: None,
            constraints: ConstraintSet::new(),
            config: SolverConfig::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_objective(mut self, objective: Objective) -> Self {
        self.objective = Some(objective);
        self
    }

    pub fn with_constraints(mut self, constraints: ConstraintSet) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Densify everything into an [`OptimizationProblem`].
    ///
    /// Fails if a term references a variable not declared in the registry or
    /// if a coefficient or bound is not finite.
    pub fn build(self) -> Result<OptimizationProblem> {
        let width = self.registry.len();
        if width == 0 {
            return Err(ModelError::Build(format!(
                "model '{}' declares no variables",
                self.name
            )));
        }

        let objective = self.objective.ok_or_else(|| {
            ModelError::Build(format!("model '{}' has no objective", self.name))
        })?;
        let coefficients =
            densify(&self.registry, objective.expr.terms(), "objective")?;
        let constant = objective.expr.constant_part();
        if !constant.is_finite() {
            return Err(ModelError::Build(format!(
                "objective constant {constant} is not finite"
            )));
        }

        let mut constraints = Vec::with_capacity(self.constraints.len());
        for group in &self.constraints.groups {
            debug!(
                model = %self.name,
                group = %group.name,
                count = group.constraints.len(),
                "adding constraint group"
            );
            for (i, linear) in group.constraints.iter().enumerate() {
                let label = if linear.name().is_empty() {
                    format!("{}#{}", group.name, i)
                } else {
                    linear.name().to_string()
                };
                let row = densify(&self.registry, linear.terms(), &label)?;
                if !linear.bound().is_finite() {
                    return Err(ModelError::Build(format!(
                        "constraint '{label}' has non-finite bound {}",
                        linear.bound()
                    )));
                }
                constraints.push(
                    Constraint::new(linear.constraint_type(), row, linear.bound())
                        .with_name(label)
                        .with_group(group.name.clone()),
                );
            }
        }

        debug!(
            model = %self.name,
            variables = width,
            constraints = constraints.len(),
            "model built"
        );

        Ok(OptimizationProblem {
            name: self.name,
            description: self.description,
            objective: ObjectiveFunction::new(objective.direction, coefficients)
                .with_constant(constant),
            constraints,
            variables: self.registry.variables().to_vec(),
            solver_config: self.config,
        })
    }
}

fn densify(
    registry: &VariableRegistry,
    terms: &[(VariableId, f64)],
    label: &str,
) -> Result<Vec<f64>> {
    let mut row = vec![0.0; registry.len()];
    for &(var, coefficient) in terms {
        if !registry.contains(var) {
            return Err(ModelError::Build(format!(
                "'{label}' references variable #{} not declared in this model",
                var.index()
            )));
        }
        if !coefficient.is_finite() {
            return Err(ModelError::Build(format!(
                "'{label}' has non-finite coefficient {coefficient} on '{}'",
                registry.variables()[var.index()].name
            )));
        }
        row[var.index()] += coefficient;
    }
    Ok(row)
}
