//! Catalog entity shapes (styles and products).
//!
//! Plain data: proposed requests, persisted master snapshots, and the schema
//! each entity exposes to rules. No validation logic lives here.

pub mod product;
pub mod style;

pub use product::{MasterProduct, Product, ProductRequest};
pub use style::{MasterStyle, Style, StyleRequest};
