//! Two-variable revenue LPs.
//!
//! Both maximize a linear revenue over continuous `x` and `y`. The variables
//! are declared with a lower bound of zero, since negative quantities have no
//! meaning here. Leaving them free gives the same optimum for both problems.

use crate::builder::{ConstraintSet, ModelBuilder, ModelError, ObjectiveAssembler, VariableRegistry};
use crate::domain::{OptimizationProblem, VariableType};

/// Product mix: maximize `40x + 50y` s.t. `2x + y <= 32`, `2x + 3y <= 48`.
pub fn product_mix() -> Result<OptimizationProblem, ModelError> {
    let mut registry = VariableRegistry::new();
    let x = registry.scalar(VariableType::Continuous, "x");
    let y = registry.scalar(VariableType::Continuous, "y");

    let mut objective = ObjectiveAssembler::maximize();
    objective.add_expr(40.0 * x + 50.0 * y);

    let constraints = ConstraintSet::new().with_group(
        "resources",
        [
            (2.0 * x + y).leq(32.0).named("resource_a"),
            (2.0 * x + 3.0 * y).leq(48.0).named("resource_b"),
        ],
    );

    ModelBuilder::new("product_mix", registry)
        .with_description("maximize revenue from two products under two resource limits")
        .with_objective(objective.finish())
        .with_constraints(constraints)
        .build()
}

/// Farm allocation over `x` and `y` acres of two crops.
pub fn farm_allocation() -> Result<OptimizationProblem, ModelError> {
    let mut registry = VariableRegistry::new();
    let x = registry.scalar(VariableType::Continuous, "x");
    let y = registry.scalar(VariableType::Continuous, "y");

    let mut objective = ObjectiveAssembler::maximize();
    objective.add_expr(143.0 * x + 60.0 * y);

    let constraints = ConstraintSet::new().with_group(
        "farm",
        [
            (120.0 * x + 210.0 * y).leq(15000.0).named("bankroll"),
            (110.0 * x + 30.0 * y).leq(4000.0).named("storage"),
            (x + y).leq(75.0).named("acres"),
        ],
    );

    ModelBuilder::new("farm_allocation", registry)
        .with_description("split 75 acres between two crops under budget and storage limits")
        .with_objective(objective.finish())
        .with_constraints(constraints)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OptimizationType;

    #[test]
    fn product_mix_shape() {
        let problem = product_mix().unwrap();
        assert_eq!(problem.objective.optimization_type, OptimizationType::Maximize);
        assert_eq!(problem.objective.coefficients, vec![40.0, 50.0]);
        assert_eq!(problem.constraints[1].coefficients, vec![2.0, 3.0]);
        assert_eq!(problem.constraints[1].bound, 48.0);
        assert!(!problem.is_mixed_integer());
    }

    #[test]
    fn farm_allocation_shape() {
        let problem = farm_allocation().unwrap();
        let names: Vec<_> = problem.constraints.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["bankroll", "storage", "acres"]);
        assert_eq!(problem.constraints[2].coefficients, vec![1.0, 1.0]);
    }

    #[test]
    fn quantities_are_bounded_below_by_zero() {
        for problem in [product_mix().unwrap(), farm_allocation().unwrap()] {
            for variable in &problem.variables {
                assert_eq!(variable.lower_bound, 0.0, "{}", variable.name);
                assert_eq!(variable.upper_bound, None, "{}", variable.name);
            }
        }
    }
}
