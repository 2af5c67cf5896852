//! Environment variable validation
//!
//! Declare typed constraints for the variables a process needs, optionally
//! load `.env` files, and fail fast (or collect diagnostics) at startup.
//!
//! ## Features
//!
//! - **Four constraint kinds**: `number` (with bounds), `string` (with regex),
//!   `boolean` (`true`/`false`/`1`/`0`) and `enum`
//! - **Defaults** injected into the environment for unset variables
//! - **Env file loading** via `dotenvy`, with file lists computed from the
//!   environment (e.g. `.env.${APP_ENV}`)
//! - **Schema files** in TOML, with `ENVGATE_*` option overrides
//!
//! ## Validation Order
//!
//! ```text
//! env files → default injection → required check → type checks
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use envgate::{Constraint, ConstraintSet, ProcessEnv, ValidationOptions, Validator};
//!
//! let constraints = ConstraintSet::new()
//!     .with("PORT", Constraint::number().required().min(1.0).max(65535.0))?
//!     .with("LOG_LEVEL", Constraint::one_of(["debug", "info", "warn"]).default_value("info")?)?;
//!
//! let validator = Validator::new(
//!     constraints,
//!     ValidationOptions::new().apply_defaults(true).exit_on_error(false),
//! );
//!
//! if let Some(errors) = validator.load_and_validate(&mut ProcessEnv) {
//!     for err in errors {
//!         eprintln!("{err}");
//!     }
//! }
//! # Ok::<(), envgate::ConfigError>(())
//! ```

pub mod config;
pub mod constraint;
pub mod env;
pub mod error;
pub mod loader;
pub mod validator;

// Re-export main types
pub use config::{Schema, load_schema, load_schema_from_str};
pub use constraint::{Constraint, ConstraintSet};
pub use env::{EnvSnapshot, MapEnv, ProcessEnv};
pub use error::{ConfigError, LoadError};
pub use loader::{DotenvParser, EnvFileParser, LoadSummary};
pub use validator::{
    EnvFiles, ErrorList, ProcessTerminator, RecordingTerminator, Terminator, ValidationOptions,
    Validator,
};
