use crate::domain::{
    models::OptimizationProblem,
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolverBackend,
};
use crate::solver::MicroLpSolver;
#[cfg(feature = "coin_cbc")]
use crate::solver::CoinCbcSolver;
#[cfg(feature = "highs")]
use crate::solver::HighsSolver;
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create the solver named by the problem's configuration
    pub fn create_solver(problem: &OptimizationProblem) -> Result<Arc<dyn SolverService>> {
        Self::create_from_backend(problem.solver_config.backend)
    }

    /// Create a solver for a specific backend
    ///
    /// Fails with [`SolverError::SolverNotAvailable`] when the backend was not
    /// compiled in.
    pub fn create_from_backend(backend: SolverBackend) -> Result<Arc<dyn SolverService>> {
        match backend {
            SolverBackend::Auto => Ok(Self::default_solver()),
            SolverBackend::MicroLp => Ok(Arc::new(MicroLpSolver::new())),
            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => Ok(Arc::new(CoinCbcSolver::new())),
            #[cfg(feature = "highs")]
            SolverBackend::Highs => Ok(Arc::new(HighsSolver::new())),
            #[allow(unreachable_patterns)]
            other => Err(SolverError::SolverNotAvailable(format!(
                "{other} backend not enabled in this build"
            ))),
        }
    }

    /// Get the default solver: HiGHS, then CBC, then microlp
    pub fn default_solver() -> Arc<dyn SolverService> {
        #[cfg(feature = "highs")]
        return Arc::new(HighsSolver::new());

        #[cfg(all(feature = "coin_cbc", not(feature = "highs")))]
        return Arc::new(CoinCbcSolver::new());

        #[cfg(not(any(feature = "coin_cbc", feature = "highs")))]
        Arc::new(MicroLpSolver::new())
    }

    /// Backends usable in this build
    pub fn available_backends() -> Vec<SolverBackend> {
        let mut backends = vec![SolverBackend::MicroLp];
        if cfg!(feature = "coin_cbc") {
            backends.push(SolverBackend::CoinCbc);
        }
        if cfg!(feature = "highs") {
            backends.push(SolverBackend::Highs);
        }
        backends
    }
}
