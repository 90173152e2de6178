use tracing::debug;

use super::constraints::commitment_constraints;
use super::schedule::CommitmentSchedule;
use super::spec::UnitCommitmentSpec;
use crate::builder::{
    ModelBuilder, ModelError, Objective, ObjectiveAssembler, VariableMatrix, VariableRegistry,
};
use crate::domain::{OptimizationProblem, Solution, SolverConfig, VariableType};

/// Handles of the four decision-variable matrices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitmentVariables {
    /// p: output power, continuous and non-negative
    pub power: VariableMatrix,
    /// y: started up at the beginning of the period
    pub startup: VariableMatrix,
    /// z: shut down at the beginning of the period
    pub shutdown: VariableMatrix,
    /// v: online during the period
    pub online: VariableMatrix,
}

impl CommitmentVariables {
    pub fn register(
        registry: &mut VariableRegistry,
        spec: &UnitCommitmentSpec,
    ) -> Result<Self, ModelError> {
        let (units, periods) = (spec.unit_count(), spec.period_count());
        Ok(Self {
            power: registry.create(VariableType::Continuous, "p", units, periods)?,
            startup: registry.create(VariableType::Binary, "y", units, periods)?,
            shutdown: registry.create(VariableType::Binary, "z", units, periods)?,
            online: registry.create(VariableType::Binary, "v", units, periods)?,
        })
    }
}

/// Minimize Σ fixed·v + variable·p + startup·y + shutdown·z over every cell.
pub fn commitment_objective(spec: &UnitCommitmentSpec, vars: &CommitmentVariables) -> Objective {
    let mut objective = ObjectiveAssembler::minimize();
    for k in spec.period_indices() {
        for j in spec.unit_ids() {
            let unit = spec.unit(j);
            objective
                .add_term(unit.fixed_cost, vars.online[(j, k)])
                .add_term(unit.variable_cost, vars.power[(j, k)])
                .add_term(unit.startup_cost, vars.startup[(j, k)])
                .add_term(unit.shutdown_cost, vars.shutdown[(j, k)]);
        }
    }
    objective.finish()
}

/// A built unit-commitment problem together with its variable handles
#[derive(Debug, Clone)]
pub struct UnitCommitmentModel {
    pub problem: OptimizationProblem,
    pub variables: CommitmentVariables,
}

impl UnitCommitmentModel {
    pub fn build(spec: &UnitCommitmentSpec) -> Result<Self, ModelError> {
        Self::build_with_config(spec, SolverConfig::default())
    }

    pub fn build_with_config(
        spec: &UnitCommitmentSpec,
        config: SolverConfig,
    ) -> Result<Self, ModelError> {
        spec.validate()?;

        let mut registry = VariableRegistry::new();
        let variables = CommitmentVariables::register(&mut registry, spec)?;
        let objective = commitment_objective(spec, &variables);
        let constraints = commitment_constraints(spec, &variables);

        debug!(
            units = spec.unit_count(),
            periods = spec.period_count(),
            constraints = constraints.len(),
            "unit-commitment formulation generated"
        );

        let problem = ModelBuilder::new("unit_commitment", registry)
            .with_description(format!(
                "{} units over {} periods",
                spec.unit_count(),
                spec.period_count()
            ))
            .with_objective(objective)
            .with_constraints(constraints)
            .with_config(config)
            .build()?;

        Ok(Self { problem, variables })
    }

    /// Read the schedule out of an optimal (or feasible) solution.
    pub fn schedule(&self, solution: &Solution) -> Option<CommitmentSchedule> {
        if !solution.is_feasible() {
            return None;
        }
        Some(CommitmentSchedule {
            objective: solution.optimal_value?,
            power: self.variables.power.values(solution)?,
            startup: self.variables.startup.values(solution)?,
            shutdown: self.variables.shutdown.values(solution)?,
            online: self.variables.online.values(solution)?,
        })
    }
}
