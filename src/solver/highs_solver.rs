// HiGHS Solver Adapter
// Translates the domain problem into a HiGHS row problem

use crate::domain::{
    models::{OptimizationProblem, Solution as DomainSolution, SolutionQuality, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus as DomainSolutionStatus},
};
use highs::{HighsModelStatus, RowProblem, Sense};
use std::time::Instant;
use tracing::warn;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<DomainSolution> {
        self.validate(problem)?;

        let start_time = Instant::now();

        // Add variables first, then constraints
        let mut pb = RowProblem::default();
        let mut vars = Vec::with_capacity(problem.variables.len());

        for (var_def, &obj_coeff) in problem
            .variables
            .iter()
            .zip(&problem.objective.coefficients)
        {
            let lower = var_def.lower_bound;
            let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);

            let col = if var_def.is_integer() {
                pb.add_integer_column(obj_coeff, lower..upper)
            } else {
                pb.add_column(obj_coeff, lower..upper)
            };
            vars.push(col);
        }

        for constraint in &problem.constraints {
            let terms: Vec<_> = constraint
                .coefficients
                .iter()
                .zip(&vars)
                .filter(|(coeff, _)| **coeff != 0.0)
                .map(|(&coeff, &col)| (col, coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = if problem.objective.optimization_type == OptimizationType::Maximize {
            Sense::Maximise
        } else {
            Sense::Minimise
        };

        let config = &problem.solver_config;
        let mut model = pb.optimise(sense);
        model.set_option("output_flag", config.verbose);
        if let Some(seconds) = config.time_limit {
            model.set_option("time_limit", seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.solve();
        let solve_time = start_time.elapsed().as_secs_f64() * 1000.0;
        let statistics = SolverStatistics::for_problem(problem, solve_time);

        match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let objective_value = problem.objective.evaluate(&variable_values);
                let quality = SolutionQuality::measure(problem, &variable_values);

                let mut solution = DomainSolution::optimal(objective_value, variable_values)
                    .with_statistics(statistics)
                    .with_quality(quality);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                Ok(solution)
            }
            status => unsolved(status, problem, statistics),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

/// Outcome of a solve that produced no optimal assignment.
fn unsolved(
    status: HighsModelStatus,
    problem: &OptimizationProblem,
    statistics: SolverStatistics,
) -> Result<DomainSolution> {
    let solution = match status {
        HighsModelStatus::Infeasible => {
            warn!(problem = %problem.name, "HiGHS reports infeasible");
            DomainSolution::infeasible()
        }
        HighsModelStatus::Unbounded => {
            warn!(problem = %problem.name, "HiGHS reports unbounded");
            DomainSolution::unbounded()
        }
        // presolve can stop here without deciding which of the two holds
        HighsModelStatus::UnboundedOrInfeasible => {
            return Err(SolverError::ExecutionFailed(format!(
                "HiGHS found '{}' infeasible or unbounded without deciding which",
                problem.name
            )))
        }
        HighsModelStatus::ReachedTimeLimit => DomainSolution::new(
            DomainSolutionStatus::TimeLimit,
            "HiGHS stopped at its time limit",
        ),
        HighsModelStatus::ReachedIterationLimit => DomainSolution::new(
            DomainSolutionStatus::IterationLimit,
            "HiGHS stopped at its iteration limit",
        ),
        status => {
            return Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            )))
        }
    };
    Ok(solution.with_statistics(statistics))
}
