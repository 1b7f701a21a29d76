use thiserror::Error;

/// Reasons a booking request is rejected before an order is created.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Please select a service")]
    MissingService,
    #[error("Please enter your address")]
    MissingAddress,
    #[error("Please enter your bike number")]
    MissingBikeNumber,
    #[error("Please select a time slot")]
    MissingTimeSlot,
    #[error("Unknown time slot: {0}")]
    UnknownTimeSlot(String),
}
