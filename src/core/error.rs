use thiserror::Error;

/// Errors raised while configuring or running the optimizer
#[derive(Debug, Error)]
pub enum FireworksError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid search space: {0}")]
    InvalidSearchSpace(String),

    #[error("evaluator failed: {0}")]
    Evaluator(String),

    /// The evaluator broke the one-fitness-per-position contract
    #[error("evaluator returned {got} fitness values for {expected} positions")]
    EvaluationCount { expected: usize, got: usize },

    #[error("interrupted by callback: {0}")]
    Interrupted(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FireworksError>;
