// Domain service interface for solving optimization problems
// Any numerical backend that implements this trait can be plugged in

use super::models::{OptimizationProblem, Solution};

/// Error types for the solver service
///
/// Infeasible and unbounded problems are not errors: they come back as a
/// [`Solution`] with the matching status.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Solver exceeded its time limit of {0} s")]
    Timeout(f64),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();

        if problem.objective.coefficients.is_empty() {
            errors.push("Objective must have at least one coefficient".to_string());
        }

        let num_vars = problem.num_variables();

        if problem.variables.len() != num_vars {
            errors.push(format!(
                "Number of variables ({}) doesn't match objective coefficients ({})",
                problem.variables.len(),
                num_vars
            ));
        }

        for (i, constraint) in problem.constraints.iter().enumerate() {
            if constraint.num_variables() != num_vars {
                errors.push(format!(
                    "Constraint {} '{}' has {} coefficients but problem has {} variables",
                    i,
                    constraint.name,
                    constraint.num_variables(),
                    num_vars
                ));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        Constraint, ConstraintType, ObjectiveFunction, OptimizationType, Variable,
    };

    struct NullSolver;

    impl SolverService for NullSolver {
        fn solve(&self, _problem: &OptimizationProblem) -> Result<Solution> {
            Err(SolverError::SolverNotAvailable("null".into()))
        }

        fn name(&self) -> &str {
            "null"
        }

        fn supports_mip(&self) -> bool {
            false
        }
    }

    #[test]
    fn rejects_mismatched_constraint_width() {
        let problem = OptimizationProblem::new(ObjectiveFunction::new(
            OptimizationType::Minimize,
            vec![1.0, 1.0],
        ))
        .with_variables(vec![Variable::continuous("x"), Variable::continuous("y")])
        .add_constraint(
            Constraint::new(ConstraintType::Equal, vec![1.0], 1.0).with_name("short"),
        );

        let err = NullSolver.validate(&problem).unwrap_err();
        assert!(err.to_string().contains("'short' has 1 coefficients"));
    }

    #[test]
    fn rejects_inverted_bounds() {
        let problem = OptimizationProblem::new(ObjectiveFunction::new(
            OptimizationType::Minimize,
            vec![1.0],
        ))
        .with_variables(vec![Variable::continuous("x").with_bounds(2.0, Some(1.0))]);

        assert!(matches!(
            NullSolver.validate(&problem),
            Err(SolverError::InvalidProblem(_))
        ));
    }
}
