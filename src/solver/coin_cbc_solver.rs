use super::good_lp_adapter::solve_with;
use crate::domain::{
    models::{OptimizationProblem, Solution},
    solver_service::{Result, SolverService},
};
use good_lp::solvers::coin_cbc::{coin_cbc, CoinCbcProblem};

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.validate(problem)?;

        let config = &problem.solver_config;
        solve_with(problem, self.name(), coin_cbc, |model: &mut CoinCbcProblem| {
            model.set_parameter("log", if config.verbose { "1" } else { "0" });
            if let Some(seconds) = config.time_limit {
                model.set_parameter("seconds", &seconds.to_string());
            }
            if let Some(gap) = config.gap_tolerance {
                model.set_parameter("ratioGap", &gap.to_string());
            }
        })
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
