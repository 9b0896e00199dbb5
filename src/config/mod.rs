//! Configuration module
//!
//! Typed schema, YAML loading with environment substitution, and
//! validation for typewriter configuration files.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
