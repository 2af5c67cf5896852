//! Error types for envgate
//!
//! Validation failures are never errors in this sense: they are accumulated as
//! plain strings by the validator. The types here cover the fallible surfaces
//! around it (schema loading, pattern compilation, reading env files) and use
//! `thiserror` so they can be matched on by library users. The binary wraps
//! them in `anyhow` at `main`.

use std::path::PathBuf;
use thiserror::Error;

/// Schema and option errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Duplicate constraint for variable: {name}")]
    DuplicateVariable { name: String },

    #[error("Enum constraint for {name} must declare at least one value")]
    EmptyEnum { name: String },

    #[error("Invalid variable name '{name}': {reason}")]
    InvalidVariableName { name: String, reason: String },

    #[error("Invalid {kind} default '{value}'")]
    InvalidDefault { kind: &'static str, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading a `.env` file that exists on disk
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Map a `dotenvy` failure to a load error for `path`
    pub fn from_dotenv(path: impl Into<PathBuf>, err: dotenvy::Error) -> Self {
        let path = path.into();
        match err {
            dotenvy::Error::Io(source) => LoadError::Io { path, source },
            other => LoadError::Parse {
                path,
                reason: other.to_string(),
            },
        }
    }
}
