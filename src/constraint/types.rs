//! Constraint definitions
//!
//! A [`Constraint`] is the typed rule attached to one environment variable; a
//! [`ConstraintSet`] is the ordered collection of them checked in one run.

use crate::constraint::number::format_number;
use crate::env::check_variable_name;
use crate::error::ConfigError;
use regex::Regex;

/// A typed rule for a single environment variable
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Numeric value with optional inclusive bounds
    Number {
        required: bool,
        min: Option<f64>,
        max: Option<f64>,
        default: Option<f64>,
    },
    /// Free-form string, optionally matched against a pattern
    String {
        required: bool,
        regex: Option<Regex>,
        default: Option<String>,
    },
    /// One of `true`, `false`, `1`, `0`
    Boolean { required: bool, default: Option<bool> },
    /// Exact member of a fixed value list
    Enum {
        required: bool,
        values: Vec<String>,
        default: Option<String>,
    },
}

impl Constraint {
    /// Optional number with no bounds.
    pub fn number() -> Self {
        Constraint::Number {
            required: false,
            min: None,
            max: None,
            default: None,
        }
    }

    /// Optional string with no pattern.
    pub fn string() -> Self {
        Constraint::String {
            required: false,
            regex: None,
            default: None,
        }
    }

    pub fn boolean() -> Self {
        Constraint::Boolean {
            required: false,
            default: None,
        }
    }

    /// Optional enum over `values`.
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Constraint::Enum {
            required: false,
            values: values.into_iter().map(Into::into).collect(),
            default: None,
        }
    }

    /// Mark the variable as required.
    pub fn required(mut self) -> Self {
        match &mut self {
            Constraint::Number { required, .. }
            | Constraint::String { required, .. }
            | Constraint::Boolean { required, .. }
            | Constraint::Enum { required, .. } => *required = true,
        }
        self
    }

    /// Set the lower bound. Ignored for non-numeric constraints.
    pub fn min(mut self, value: f64) -> Self {
        if let Constraint::Number { min, .. } = &mut self {
            *min = Some(value);
        }
        self
    }

    /// Set the upper bound. Ignored for non-numeric constraints.
    pub fn max(mut self, value: f64) -> Self {
        if let Constraint::Number { max, .. } = &mut self {
            *max = Some(value);
        }
        self
    }

    /// Attach a compiled pattern. Ignored for non-string constraints.
    pub fn regex(mut self, pattern: Regex) -> Self {
        if let Constraint::String { regex, .. } = &mut self {
            *regex = Some(pattern);
        }
        self
    }

    /// Compile and attach a pattern.
    pub fn pattern(self, pattern: &str) -> Result<Self, ConfigError> {
        let regex = Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.regex(regex))
    }

    /// Set the default from its string form.
    ///
    /// Number defaults must parse as a number and boolean defaults must be
    /// one of `true`, `false`, `1` or `0`. String and enum defaults are taken
    /// as written and never fail.
    pub fn default_value(mut self, value: impl Into<String>) -> Result<Self, ConfigError> {
        let value = value.into();
        let kind = self.kind();
        let invalid = |value: String| ConfigError::InvalidDefault { kind, value };

        match &mut self {
            Constraint::Number { default, .. } => match super::number::parse_number(&value) {
                Some(n) => *default = Some(n),
                None => return Err(invalid(value)),
            },
            Constraint::Boolean { default, .. } => match value.as_str() {
                "true" | "1" => *default = Some(true),
                "false" | "0" => *default = Some(false),
                _ => return Err(invalid(value)),
            },
            Constraint::String { default, .. } | Constraint::Enum { default, .. } => {
                *default = Some(value);
            }
        }
        Ok(self)
    }

    pub fn with_number_default(mut self, value: f64) -> Self {
        if let Constraint::Number { default, .. } = &mut self {
            *default = Some(value);
        }
        self
    }

    pub fn with_bool_default(mut self, value: bool) -> Self {
        if let Constraint::Boolean { default, .. } = &mut self {
            *default = Some(value);
        }
        self
    }

    pub fn is_required(&self) -> bool {
        match self {
            Constraint::Number { required, .. }
            | Constraint::String { required, .. }
            | Constraint::Boolean { required, .. }
            | Constraint::Enum { required, .. } => *required,
        }
    }

    /// The default in the form written into the environment, if any.
    pub fn default_string(&self) -> Option<String> {
        match self {
            Constraint::Number { default, .. } => default.map(format_number),
            Constraint::String { default, .. } | Constraint::Enum { default, .. } => {
                default.clone()
            }
            Constraint::Boolean { default, .. } => default.map(|b| b.to_string()),
        }
    }

    /// Short name of the constraint kind, as used in schema files.
    pub fn kind(&self) -> &'static str {
        match self {
            Constraint::Number { .. } => "number",
            Constraint::String { .. } => "string",
            Constraint::Boolean { .. } => "boolean",
            Constraint::Enum { .. } => "enum",
        }
    }
}

/// Ordered mapping from variable name to constraint.
///
/// Names are unique. Iteration follows insertion order, which is also the
/// order validation errors are reported in.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    entries: Vec<(String, Constraint)>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint, rejecting unusable or duplicate names and empty enums.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        constraint: Constraint,
    ) -> Result<(), ConfigError> {
        let name = name.into();
        check_variable_name(&name)?;
        if self.contains(&name) {
            return Err(ConfigError::DuplicateVariable { name });
        }
        if let Constraint::Enum { values, .. } = &constraint {
            if values.is_empty() {
                return Err(ConfigError::EmptyEnum { name });
            }
        }
        self.entries.push((name, constraint));
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(
        mut self,
        name: impl Into<String>,
        constraint: Constraint,
    ) -> Result<Self, ConfigError> {
        self.insert(name, constraint)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Constraint> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Constraint)> {
        self.entries.iter().map(|(n, c)| (n.as_str(), c))
    }

    /// Variable names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
