use crate::builder::ModelError;
use crate::domain::SolverError;

/// Any failure between input data and a solver answer
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Solver(#[from] SolverError),
}

pub type Result<T> = std::result::Result<T, Error>;
