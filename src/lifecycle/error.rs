use thiserror::Error;

/// Errors raised when a status value falls outside the lifecycle stages.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
}
