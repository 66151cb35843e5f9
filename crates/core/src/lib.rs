//! `granja-core` — primitives shared by the capture sheets.
//!
//! This crate contains **pure** building blocks (no IO, no storage): the
//! operational section identifier, numeric coercion of free-text quantities,
//! and the domain error model.

pub mod error;
pub mod quantity;
pub mod section;

pub use error::{DomainError, DomainResult};
pub use quantity::{Quantity, sanitize_numeric};
pub use section::Section;
