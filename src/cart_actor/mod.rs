//! Cart and cart line-item rows as managed entities.

pub mod entity;
