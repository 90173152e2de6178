// Domain layer: problem representation and the solver contract
pub mod domain;

// Builder layer: registry, expressions, objective and model container
pub mod builder;

// Unit-commitment formulation built on the builder layer
pub mod unit_commitment;

// Two-variable revenue LPs
pub mod problems;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Application layer: timed, asynchronous solving
pub mod application;

pub mod error;

// Re-export commonly used types
pub use domain::{
    Constraint, ConstraintType, ObjectiveFunction, OptimizationProblem, OptimizationType, Solution,
    SolutionStatus, SolverBackend, SolverConfig, SolverError, SolverService, Variable,
    VariableType,
};

pub use builder::{
    ConstraintSet, LinearExpr, ModelBuilder, ModelError, ObjectiveAssembler, PeriodIndex, UnitId,
    VariableId, VariableMatrix, VariableRegistry,
};

pub use unit_commitment::{CommitmentSchedule, UnitCommitmentModel, UnitCommitmentSpec};

pub use application::{CommitmentOutcome, SolveService};

pub use error::Error;

#[cfg(feature = "coin_cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
pub use solver::{MicroLpSolver, SolverFactory};
