//! Schema file types
//!
//! A schema file declares the variables to validate under `[vars]` and,
//! optionally, the validation options at the top level:
//!
//! ```toml
//! files = [".env", ".env.${APP_ENV}"]
//! apply_defaults = true
//!
//! [vars.PORT]
//! type = "number"
//! required = true
//! min = 1
//! max = 65535
//! ```

use crate::constraint::{Constraint, ConstraintSet};
use crate::env::EnvSnapshot;
use crate::error::ConfigError;
use crate::validator::{EnvFiles, ValidationOptions, Validator};
use serde::Deserialize;
use std::path::PathBuf;

/// Validation options as written in a schema file or `ENVGATE_*` variables
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchemaOptions {
    /// Base directory for env files (`~` is expanded; default: cwd)
    pub base_path: Option<String>,

    /// Env file names; `${VAR}` references are expanded at load time
    pub files: Option<Vec<String>>,

    /// Exit with status 1 on validation failure
    pub exit_on_error: bool,

    /// Inject declared defaults for unset variables
    pub apply_defaults: bool,

    /// Suppress log output
    pub silent: bool,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            base_path: None,
            files: None,
            exit_on_error: true,
            apply_defaults: false,
            silent: false,
        }
    }
}

impl SchemaOptions {
    /// Resolve into [`ValidationOptions`], starting from its defaults.
    pub fn to_validation_options(&self) -> ValidationOptions {
        let mut options = ValidationOptions::default()
            .exit_on_error(self.exit_on_error)
            .apply_defaults(self.apply_defaults)
            .silent(self.silent);

        if let Some(base) = &self.base_path {
            options.base_path = PathBuf::from(shellexpand::tilde(base).as_ref());
        }

        if let Some(files) = &self.files {
            options.files = file_list(files);
        }

        options
    }
}

/// Plain names stay a fixed list; names referencing variables become a
/// computed list expanded against the snapshot.
fn file_list(files: &[String]) -> EnvFiles {
    if !files.iter().any(|f| f.contains('$')) {
        return EnvFiles::List(files.to_vec());
    }

    let templates = files.to_vec();
    EnvFiles::computed(move |env| {
        templates
            .iter()
            .map(|t| expand_file_name(t, env))
            .collect()
    })
}

/// Expand `$VAR` / `${VAR}` in a file name. Unset variables are left as written.
pub fn expand_file_name(template: &str, env: &dyn EnvSnapshot) -> String {
    shellexpand::env_with_context_no_errors(template, |var: &str| env.get(var)).into_owned()
}

/// One `[vars.NAME]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConstraintDef {
    Number {
        #[serde(default)]
        required: bool,
        min: Option<f64>,
        max: Option<f64>,
        default: Option<f64>,
    },
    String {
        #[serde(default)]
        required: bool,
        regex: Option<String>,
        default: Option<String>,
    },
    Boolean {
        #[serde(default)]
        required: bool,
        default: Option<bool>,
    },
    Enum {
        #[serde(default)]
        required: bool,
        values: Vec<String>,
        default: Option<String>,
    },
}

impl ConstraintDef {
    /// Build the runtime constraint, compiling any pattern.
    pub fn into_constraint(self) -> Result<Constraint, ConfigError> {
        let constraint = match self {
            ConstraintDef::Number {
                required,
                min,
                max,
                default,
            } => Constraint::Number {
                required,
                min,
                max,
                default,
            },
            ConstraintDef::String {
                required,
                regex,
                default,
            } => {
                let base = Constraint::String {
                    required,
                    regex: None,
                    default,
                };
                match regex {
                    Some(pattern) => base.pattern(&pattern)?,
                    None => base,
                }
            }
            ConstraintDef::Boolean { required, default } => {
                Constraint::Boolean { required, default }
            }
            ConstraintDef::Enum {
                required,
                values,
                default,
            } => Constraint::Enum {
                required,
                values,
                default,
            },
        };
        Ok(constraint)
    }
}

/// A loaded schema: constraints plus options
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub constraints: ConstraintSet,
    pub options: SchemaOptions,
}

impl Schema {
    /// Build a validator with the default collaborators.
    pub fn into_validator(self) -> Validator {
        let options = self.options.to_validation_options();
        Validator::new(self.constraints, options)
    }
}
