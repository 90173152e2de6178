// Translation of an OptimizationProblem into a good_lp model, shared by every
// backend that good_lp drives

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolutionQuality, SolverStatistics},
    solver_service::{Result, SolverError},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus},
};
use good_lp::{
    solvers::Solver, variable, Expression, ProblemVariables, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus as GoodLpStatus, SolverModel,
    Variable as GoodLpVariable,
};
use std::time::Instant;
use tracing::{debug, warn};

/// Build the good_lp model with `solver`, let `configure` tune it, then solve.
pub(crate) fn solve_with<S, F>(
    problem: &OptimizationProblem,
    backend: &str,
    solver: S,
    configure: F,
) -> Result<DomainSolution>
where
    S: Solver,
    S::Model: SolverModel<Error = ResolutionError>,
    F: FnOnce(&mut S::Model),
{
    let start_time = Instant::now();

    let mut vars = ProblemVariables::new();
    let lp_variables: Vec<GoodLpVariable> = problem
        .variables
        .iter()
        .map(|var_def| {
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
            let definition = variable()
                .min(var_def.lower_bound)
                .max(upper)
                .name(var_def.name.clone());
            if var_def.is_integer() {
                vars.add(definition.integer())
            } else {
                vars.add(definition)
            }
        })
        .collect();

    let mut obj_expr: Expression = 0.into();
    for (&coeff, &var) in problem.objective.coefficients.iter().zip(&lp_variables) {
        if coeff != 0.0 {
            obj_expr += coeff * var;
        }
    }

    let unsolved = match problem.objective.optimization_type {
        OptimizationType::Maximize => vars.maximise(obj_expr),
        OptimizationType::Minimize => vars.minimise(obj_expr),
    };
    let mut lp_model = unsolved.using(solver);

    for constraint in &problem.constraints {
        let mut lhs: Expression = 0.into();
        for (&coeff, &var) in constraint.coefficients.iter().zip(&lp_variables) {
            if coeff != 0.0 {
                lhs += coeff * var;
            }
        }

        lp_model = match constraint.constraint_type {
            ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
            ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
            ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
        };
    }

    configure(&mut lp_model);

    debug!(
        backend,
        problem = %problem.name,
        variables = lp_variables.len(),
        constraints = problem.constraints.len(),
        "handing model to solver"
    );

    let solution_result = lp_model.solve();
    let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
    let statistics = SolverStatistics::for_problem(problem, solve_time);

    match solution_result {
        Ok(sol) => {
            let variable_values: Vec<f64> =
                lp_variables.iter().map(|&var| sol.value(var)).collect();
            let objective_value = problem.objective.evaluate(&variable_values);
            let quality = SolutionQuality::measure(problem, &variable_values);

            let stop = sol.status();
            let mut solution = DomainSolution::optimal(objective_value, variable_values)
                .with_statistics(statistics)
                .with_quality(quality);
            solution.status = status_of(stop);
            solution.message = match stop {
                GoodLpStatus::Optimal => {
                    format!("Optimal solution found for '{}'", problem.name)
                }
                GoodLpStatus::TimeLimit => format!(
                    "{backend} stopped at its time limit on '{}'",
                    problem.name
                ),
                GoodLpStatus::GapLimit => format!(
                    "{backend} stopped at its gap limit on '{}'",
                    problem.name
                ),
            };
            if !solution.is_optimal() {
                warn!(
                    backend,
                    problem = %problem.name,
                    status = %solution.status,
                    "solve stopped early"
                );
            }
            Ok(solution)
        }
        Err(ResolutionError::Infeasible) => {
            warn!(backend, problem = %problem.name, "problem is infeasible");
            Ok(DomainSolution::infeasible().with_statistics(statistics))
        }
        Err(ResolutionError::Unbounded) => {
            warn!(backend, problem = %problem.name, "problem is unbounded");
            Ok(DomainSolution::unbounded().with_statistics(statistics))
        }
        Err(e) => Err(SolverError::ExecutionFailed(format!("{backend}: {e}"))),
    }
}

/// Domain status of a solution good_lp returned.
fn status_of(status: GoodLpStatus) -> SolutionStatus {
    match status {
        GoodLpStatus::Optimal => SolutionStatus::Optimal,
        GoodLpStatus::TimeLimit => SolutionStatus::TimeLimit,
        GoodLpStatus::GapLimit => SolutionStatus::Feasible,
    }
}
