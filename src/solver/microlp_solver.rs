// Pure-Rust backend: good_lp driving microlp (simplex plus branch-and-bound)

use super::good_lp_adapter::solve_with;
use crate::domain::{
    models::{OptimizationProblem, Solution},
    solver_service::{Result, SolverService},
};
use good_lp::solvers::microlp::microlp;

pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MicroLpSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for MicroLpSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
        self.validate(problem)?;
        solve_with(problem, self.name(), microlp, |_| {})
    }

    fn name(&self) -> &str {
        "microlp"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
