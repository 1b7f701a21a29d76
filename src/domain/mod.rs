pub mod product;
pub mod order;

pub use product::*;
pub use order::*;

/// Whole rupees.
pub type Price = u64;
