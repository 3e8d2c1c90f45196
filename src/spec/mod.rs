//! Spec documents: discovery, loading and `$ref` resolution

pub mod loader;
pub mod locator;
pub mod models;
pub mod resolver;

pub use loader::{load_spec, parse_spec};
pub use locator::discover;
pub use models::*;
pub use resolver::resolve;
