//! Typed clients for the catalog and cart tables.
//!
//! Every method answers with an [`Outcome`](crate::outcome::Outcome), so
//! callers handle products, carts and line items the same way.

mod macros;
pub mod cart_client;
pub mod product_client;

pub use cart_client::*;
pub use product_client::*;
