//! Product and product-media rows as managed entities.

pub mod entity;
