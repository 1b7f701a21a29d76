use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::booking::BookingError;
use crate::lifecycle::OrderStatus;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Booking rejected: {0}")]
    InvalidBooking(#[from] BookingError),
    #[error("Order {0} is cancelled")]
    Cancelled(String),
    #[error("Order {id} cannot be cancelled once {status}")]
    NotCancellable { id: String, status: OrderStatus },
    #[error("Order {0} is no longer open")]
    NotOpen(String),
    #[error("Order {id} cannot be rated while {status}")]
    NotRateable { id: String, status: OrderStatus },
    #[error("Order {0} is already rated")]
    AlreadyRated(String),
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
