//! Typed clients over the resource actors.

mod macros;
pub mod order_client;
pub mod product_client;

pub use order_client::*;
pub use product_client::*;
