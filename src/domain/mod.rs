//! Catalog and cart records with their create payloads and partial models.

pub mod cart;
pub mod product;

pub use cart::*;
pub use product::*;
