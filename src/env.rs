//! Environment snapshots.
//!
//! The validator never touches the process environment directly. It reads and
//! writes through an [`EnvSnapshot`], which is either the real environment
//! ([`ProcessEnv`]) or an in-memory map ([`MapEnv`]).

use crate::error::ConfigError;
use std::collections::BTreeMap;
use tracing::warn;

/// Check that `name` can be used as a process environment variable name.
///
/// Empty names and names containing `=` or NUL are rejected; the platform
/// cannot store them.
pub fn check_variable_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.is_empty() {
        "must not be empty"
    } else if name.contains('=') {
        "must not contain '='"
    } else if name.contains('\0') {
        "must not contain NUL"
    } else {
        return Ok(());
    };

    Err(ConfigError::InvalidVariableName {
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Key/value view of an environment.
pub trait EnvSnapshot {
    /// Current value of `key`, or `None` when unset.
    fn get(&self, key: &str) -> Option<String>;

    /// Set `key` to `value`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str);

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// The environment of the running process.
///
/// Values that are not valid UTF-8 are read lossily, so a set variable is
/// never reported as absent.
///
/// Writes go through `std::env::set_var`, which is only sound while no other
/// thread reads or writes the environment. Use it at startup, before spawning
/// threads or an async runtime. Keys rejected by [`check_variable_name`] and
/// values containing NUL are skipped with a warning instead of written.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn new() -> Self {
        Self
    }
}

impl EnvSnapshot for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(e) = check_variable_name(key) {
            warn!(error = %e, "Skipping environment write");
            return;
        }
        if value.contains('\0') {
            warn!(variable = key, "Skipping environment write: value contains NUL");
            return;
        }
        // SAFETY: ProcessEnv is documented as single-threaded startup use only.
        unsafe {
            std::env::set_var(key, value);
        }
    }
}

/// In-memory environment, mostly for tests and dry runs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MapEnv {
    vars: BTreeMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `key`, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.vars.remove(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl EnvSnapshot for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

impl<K, V> FromIterator<(K, V)> for MapEnv
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_env_get_set() {
        let mut env = MapEnv::new();
        assert_eq!(env.get("A"), None);
        env.set("A", "1");
        assert_eq!(env.get("A"), Some("1".to_string()));
        assert!(env.contains("A"));
        env.set("A", "2");
        assert_eq!(env.get("A"), Some("2".to_string()));
        assert_eq!(env.remove("A"), Some("2".to_string()));
        assert!(env.is_empty());
    }

    #[test]
    fn test_map_env_from_iter() {
        let env: MapEnv = [("B", "x"), ("A", "y")].into_iter().collect();
        assert_eq!(env.len(), 2);
        let keys: Vec<_> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[test]
    #[serial_test::serial]
    fn test_process_env_round_trip() {
        let mut env = ProcessEnv::new();
        env.set("ENVGATE_TEST_PROCESS_ENV", "on");
        assert_eq!(
            env.get("ENVGATE_TEST_PROCESS_ENV"),
            Some("on".to_string())
        );
        unsafe {
            std::env::remove_var("ENVGATE_TEST_PROCESS_ENV");
        }
        assert!(!env.contains("ENVGATE_TEST_PROCESS_ENV"));
    }

    #[cfg(unix)]
    #[test]
    #[serial_test::serial]
    fn test_process_env_reads_non_utf8_lossily() {
        use crate::constraint::{Constraint, ConstraintSet};
        use crate::validator::{ValidationOptions, Validator};
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let key = "ENVGATE_TEST_NON_UTF8";
        let raw = OsStr::from_bytes(b"caf\xe9");
        unsafe {
            std::env::set_var(key, raw);
        }

        let env = ProcessEnv::new();
        assert_eq!(env.get(key), Some("caf\u{FFFD}".to_string()));

        let constraints = ConstraintSet::new()
            .with(
                key,
                Constraint::string()
                    .required()
                    .default_value("fallback")
                    .unwrap(),
            )
            .unwrap();
        let validator = Validator::new(
            constraints,
            ValidationOptions::new()
                .apply_defaults(true)
                .exit_on_error(false)
                .silent(true),
        );

        let mut env = ProcessEnv::new();
        assert_eq!(validator.validate(&mut env), None);
        assert_eq!(std::env::var_os(key).as_deref(), Some(raw));

        unsafe {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_process_env_skips_unwritable_keys() {
        let mut env = ProcessEnv::new();
        env.set("", "x");
        env.set("A=B", "x");
        env.set("ENVGATE_TEST_NUL", "a\0b");
        assert!(!env.contains("ENVGATE_TEST_NUL"));
    }

    #[test]
    fn test_check_variable_name() {
        assert!(check_variable_name("PORT").is_ok());
        assert!(check_variable_name("lower_case.dotted").is_ok());
        for bad in ["", "A=B", "NUL\0"] {
            assert!(matches!(
                check_variable_name(bad),
                Err(ConfigError::InvalidVariableName { .. })
            ));
        }
    }
}
