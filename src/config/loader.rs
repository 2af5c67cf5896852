//! Schema loader with layered options
//!
//! Constraints come from the `[vars]` table of the schema file, in the order
//! they are declared. Options are layered with the following precedence
//! (highest to lowest):
//! 1. Environment variables (ENVGATE_*)
//! 2. Schema file (TOML, top-level keys)
//! 3. Default values

use crate::config::types::{ConstraintDef, Schema, SchemaOptions};
use crate::constraint::ConstraintSet;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default schema file name, looked up in the working directory
pub const DEFAULT_SCHEMA_PATH: &str = "envgate.toml";

/// Prefix for option overrides in the environment
pub const ENV_PREFIX: &str = "ENVGATE";

/// Load a schema from a TOML string (no environment overrides)
pub fn load_schema_from_str(toml_str: &str) -> Result<Schema, ConfigError> {
    let constraints = parse_constraints(toml_str)?;

    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let options: SchemaOptions = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    Ok(Schema {
        constraints,
        options,
    })
}

/// Load a schema file, applying `ENVGATE_*` option overrides
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::Load(format!(
            "Schema file not found: {}",
            path.display()
        )));
    }

    let contents = std::fs::read_to_string(path)?;
    let constraints = parse_constraints(&contents)?;

    // e.g. ENVGATE_APPLY_DEFAULTS=true, ENVGATE_FILES=.env,.env.local
    let config = Config::builder()
        .add_source(File::from_str(&contents, FileFormat::Toml))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("files"),
        )
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let options: SchemaOptions = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    Ok(Schema {
        constraints,
        options,
    })
}

/// Parse `[vars]` into an ordered constraint set.
///
/// Parsed with `toml` directly so variable names keep their case and
/// declaration order.
fn parse_constraints(toml_str: &str) -> Result<ConstraintSet, ConfigError> {
    let table: toml::Table =
        toml::from_str(toml_str).map_err(|e| ConfigError::Load(e.to_string()))?;

    let mut constraints = ConstraintSet::new();

    let vars = match table.get("vars") {
        None => return Ok(constraints),
        Some(toml::Value::Table(vars)) => vars,
        Some(_) => {
            return Err(ConfigError::Invalid {
                message: "vars must be a table".to_string(),
            });
        }
    };

    for (name, value) in vars {
        let def: ConstraintDef = value.clone().try_into().map_err(|e: toml::de::Error| {
            ConfigError::Invalid {
                message: format!("vars.{}: {}", name, e),
            }
        })?;
        constraints.insert(name.clone(), def.into_constraint()?)?;
    }

    Ok(constraints)
}
