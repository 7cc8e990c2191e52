//! Error types for dayplan.

use thiserror::Error;

/// Errors that can occur in dayplan operations.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not load saved plans: {0}")]
    Load(String),

    #[error("Could not parse plans: {0}")]
    Parse(String),

    #[error("Could not save plans: {0}")]
    Persist(String),

    #[error("Advisory request failed: {0}")]
    Advisory(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid month '{0}'. Expected YYYY-MM")]
    InvalidMonth(String),

    #[error("Invalid field: {0}")]
    InvalidField(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for dayplan operations.
pub type PlanResult<T> = Result<T, PlanError>;
