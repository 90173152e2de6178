// Application service: runs a blocking solver backend off the async runtime,
// bounded by the problem's time limit

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::domain::{
    OptimizationProblem, Solution, SolutionStatus, SolverBackend, SolverConfig, SolverError,
    SolverService,
};
use crate::error::Result;
use crate::solver::SolverFactory;
use crate::unit_commitment::{CommitmentSchedule, UnitCommitmentModel, UnitCommitmentSpec};

/// Outcome of a unit-commitment solve
#[derive(Debug, Clone)]
pub enum CommitmentOutcome {
    Scheduled(CommitmentSchedule),
    Infeasible,
    Unbounded,
    /// The solver stopped without a usable assignment
    Stopped(SolutionStatus, String),
}

/// Runs problems on the service's solver, or on the backend a problem's
/// configuration names explicitly
pub struct SolveService {
    solver: Arc<dyn SolverService>,
}

impl SolveService {
    pub fn new(solver: Arc<dyn SolverService>) -> Self {
        Self { solver }
    }

    /// Service backed by the backend named in `config`.
    pub fn from_config(config: &SolverConfig) -> std::result::Result<Self, SolverError> {
        Ok(Self::new(SolverFactory::create_from_backend(config.backend)?))
    }

    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }

    /// Solver for `problem`: the service's own for [`SolverBackend::Auto`],
    /// otherwise the named backend.
    fn solver_for(
        &self,
        problem: &OptimizationProblem,
    ) -> std::result::Result<Arc<dyn SolverService>, SolverError> {
        match problem.solver_config.backend {
            SolverBackend::Auto => Ok(Arc::clone(&self.solver)),
            _ => SolverFactory::create_solver(problem),
        }
    }

    /// Solve on a blocking thread.
    ///
    /// A backend named in `solver_config.backend` that is not compiled in
    /// fails with [`SolverError::SolverNotAvailable`]. With
    /// `solver_config.time_limit` set, a solve that runs longer fails with
    /// [`SolverError::Timeout`]. Dropping the returned future abandons the
    /// result.
    pub async fn solve(
        &self,
        problem: OptimizationProblem,
    ) -> std::result::Result<Solution, SolverError> {
        let solver = self.solver_for(&problem)?;
        if problem.is_mixed_integer() && !solver.supports_mip() {
            return Err(SolverError::InvalidProblem(format!(
                "'{}' has integer variables but {} only solves LPs",
                problem.name,
                solver.name()
            )));
        }

        info!(
            problem = %problem.name,
            solver = solver.name(),
            variables = problem.num_variables(),
            constraints = problem.constraints.len(),
            "solving"
        );

        let time_limit = problem.solver_config.time_limit;
        if let Some(seconds) = time_limit {
            if !seconds.is_finite() || seconds <= 0.0 {
                return Err(SolverError::InvalidProblem(format!(
                    "time limit must be a positive number of seconds (got {seconds})"
                )));
            }
        }
        let task = tokio::task::spawn_blocking(move || solver.solve(&problem));

        let joined = match time_limit {
            Some(seconds) => tokio::time::timeout(Duration::from_secs_f64(seconds), task)
                .await
                .map_err(|_| SolverError::Timeout(seconds))?,
            None => task.await,
        };
        let solution = joined
            .map_err(|e| SolverError::ExecutionFailed(format!("solver task failed: {e}")))??;

        if solution.is_optimal() {
            info!(
                status = %solution.status,
                objective = ?solution.optimal_value,
                solve_time_ms = solution.statistics.solve_time_ms,
                max_violation = solution.quality.max_constraint_violation,
                "solve finished"
            );
        } else {
            warn!(status = %solution.status, message = %solution.message, "no optimal solution");
        }
        Ok(solution)
    }

    /// Build, solve and read back a unit-commitment schedule.
    pub async fn solve_unit_commitment(
        &self,
        spec: &UnitCommitmentSpec,
        config: SolverConfig,
    ) -> Result<CommitmentOutcome> {
        let model = UnitCommitmentModel::build_with_config(spec, config)?;
        let solution = self.solve(model.problem.clone()).await?;

        let outcome = match solution.status {
            SolutionStatus::Infeasible => CommitmentOutcome::Infeasible,
            SolutionStatus::Unbounded => CommitmentOutcome::Unbounded,
            status => match model.schedule(&solution) {
                Some(schedule) => CommitmentOutcome::Scheduled(schedule),
                None => CommitmentOutcome::Stopped(status, solution.message),
            },
        };
        Ok(outcome)
    }
}
