//! Order-specific domain logic: lifecycle actions and cancellation.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
