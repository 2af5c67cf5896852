//! Configuration module
//!
//! Handles loading constraint schemas and validation options from TOML files
//! and environment variables.

pub mod loader;
pub mod types;

pub use loader::{DEFAULT_SCHEMA_PATH, ENV_PREFIX, load_schema, load_schema_from_str};
pub use types::*;
