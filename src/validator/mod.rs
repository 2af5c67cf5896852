//! Constraint validation engine
//!
//! [`Validator::validate`] walks a [`ConstraintSet`] in declaration order and
//! checks each variable against an [`EnvSnapshot`]:
//!
//! ```text
//! inject default (if enabled) → required check → type-specific checks
//! ```
//!
//! Errors are accumulated as human-readable strings. A required variable that
//! is missing stops the checks for that variable, as does a value that is not
//! a number for a numeric constraint. Variables not in the set are ignored.
//!
//! When the run produced errors they are logged (unless `silent`) and then,
//! depending on `exit_on_error`, either returned or the process is terminated
//! with status 1.

pub mod options;
pub mod terminator;

pub use options::{DEFAULT_ENV_FILE, EnvFiles, ValidationOptions};
pub use terminator::{ProcessTerminator, RecordingTerminator, Terminator};

use crate::constraint::{Constraint, ConstraintSet, format_number, parse_number};
use crate::env::EnvSnapshot;
use crate::loader::{DotenvParser, EnvFileParser};
use std::sync::Arc;
use tracing::{debug, error};

/// Values accepted by boolean constraints
pub const BOOLEAN_LITERALS: &[&str] = &["true", "false", "1", "0"];

/// Exit status used when validation fails with `exit_on_error`
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Ordered list of error messages
pub type ErrorList = Vec<String>;

/// Validates an environment against a constraint set.
pub struct Validator {
    pub(crate) constraints: ConstraintSet,
    pub(crate) options: ValidationOptions,
    pub(crate) terminator: Arc<dyn Terminator>,
    pub(crate) parser: Arc<dyn EnvFileParser>,
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("constraints", &self.constraints)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Create a validator that exits the process on failure (when configured)
    /// and reads env files with `dotenvy`.
    pub fn new(constraints: ConstraintSet, options: ValidationOptions) -> Self {
        Self {
            constraints,
            options,
            terminator: Arc::new(ProcessTerminator),
            parser: Arc::new(DotenvParser),
        }
    }

    /// Replace the action taken when validation fails with `exit_on_error`.
    pub fn with_terminator(mut self, terminator: Arc<dyn Terminator>) -> Self {
        self.terminator = terminator;
        self
    }

    /// Replace the env file parser used by [`load_and_validate`](Self::load_and_validate).
    pub fn with_parser(mut self, parser: Arc<dyn EnvFileParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn options(&self) -> &ValidationOptions {
        &self.options
    }

    /// Check every constraint against `env`.
    ///
    /// Returns `None` when all variables are valid. On failure returns the
    /// error list, unless `exit_on_error` is set, in which case the
    /// terminator is invoked and `None` is returned if it comes back.
    pub fn validate(&self, env: &mut dyn EnvSnapshot) -> Option<ErrorList> {
        let errors = self.collect_errors(env);
        self.finish(errors)
    }

    /// Run all checks and return the raw error list, without logging or exiting.
    pub(crate) fn collect_errors(&self, env: &mut dyn EnvSnapshot) -> ErrorList {
        let mut errors = Vec::new();

        for (name, constraint) in self.constraints.iter() {
            // Checks below use the value as it was before default injection
            let value = env.get(name);

            if value.is_none() && self.options.apply_defaults {
                if let Some(default) = constraint.default_string() {
                    debug!(variable = name, value = %default, "Applying default");
                    env.set(name, &default);
                }
            }

            check_constraint(name, constraint, value.as_deref(), &mut errors);
        }

        errors
    }

    /// Apply the reporting policy to a finished error list.
    pub(crate) fn finish(&self, errors: ErrorList) -> Option<ErrorList> {
        if errors.is_empty() {
            return None;
        }

        if !self.options.silent {
            for err in &errors {
                error!("{}", err);
            }
        }

        if self.options.exit_on_error {
            self.terminator.terminate(FAILURE_EXIT_CODE);
            None
        } else {
            Some(errors)
        }
    }
}

/// Check one variable, appending any errors.
fn check_constraint(
    name: &str,
    constraint: &Constraint,
    value: Option<&str>,
    errors: &mut ErrorList,
) {
    let Some(value) = value else {
        if constraint.is_required() {
            errors.push(format!("Missing required environment variable: {name}"));
        }
        return;
    };

    match constraint {
        Constraint::Number { min, max, .. } => {
            let Some(number) = parse_number(value) else {
                errors.push(format!("Invalid number for environment variable: {name}"));
                return;
            };
            if let Some(min) = min {
                if number < *min {
                    errors.push(format!(
                        "Value for {name} is below minimum: {}",
                        format_number(*min)
                    ));
                }
            }
            if let Some(max) = max {
                if number > *max {
                    errors.push(format!(
                        "Value for {name} exceeds maximum: {}",
                        format_number(*max)
                    ));
                }
            }
        }
        Constraint::String { regex, .. } => {
            if let Some(regex) = regex {
                if !regex.is_match(value) {
                    errors.push(format!("Invalid value for environment variable: {name}"));
                }
            }
        }
        Constraint::Boolean { .. } => {
            if !BOOLEAN_LITERALS.contains(&value) {
                errors.push(format!(
                    "Invalid boolean for environment variable: {name} (got \"{value}\")"
                ));
            }
        }
        Constraint::Enum { values, .. } => {
            if !values.iter().any(|v| v == value) {
                errors.push(format!(
                    "Invalid value for environment variable: {name} (got \"{value}\")"
                ));
            }
        }
    }
}
