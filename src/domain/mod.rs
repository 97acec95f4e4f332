//! Domain types and DTOs
//!
//! These types define the data structures for the menu catalog.

pub mod ai;
pub mod error;
pub mod menu;

pub use error::{CatalogError, CatalogResult};
pub use menu::*;

// AI types are accessed via crate::domain::ai:: to avoid namespace pollution
