// Application layer: orchestrates model building and solving

pub mod solve_service;

pub use solve_service::{CommitmentOutcome, SolveService};
