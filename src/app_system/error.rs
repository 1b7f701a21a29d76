use thiserror::Error;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;

/// Errors surfaced by system startup and shutdown.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SystemError {
    #[error("Product operation failed: {0}")]
    Product(#[from] ProductError),
    #[error("Order operation failed: {0}")]
    Order(#[from] OrderError),
    #[error("Actor task failed: {0}")]
    ActorTaskFailed(String),
}
