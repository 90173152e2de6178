/// Errors raised while turning input data into a model
///
/// Both kinds are detected before any solver is invoked.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Malformed unit, period or variable data
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The assembled model is inconsistent
    #[error("Model build error: {0}")]
    Build(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
