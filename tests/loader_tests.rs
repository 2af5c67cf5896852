//! Env file loading tests

use envgate::{
    Constraint, ConstraintSet, EnvFileParser, EnvSnapshot, LoadError, LoadSummary, MapEnv,
    RecordingTerminator, ValidationOptions, Validator,
};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::{TempDir, tempdir};

fn write_env(dir: &TempDir, name: &str, contents: &str) {
    fs::write(dir.path().join(name), contents).unwrap();
}

fn options_in(dir: &TempDir) -> ValidationOptions {
    ValidationOptions::new()
        .base_path(dir.path())
        .exit_on_error(false)
        .silent(true)
}

#[test]
fn test_loads_default_env_file() {
    let dir = tempdir().unwrap();
    write_env(&dir, ".env", "PORT=8080\n");

    let constraints = ConstraintSet::new()
        .with("PORT", Constraint::number().required())
        .unwrap();
    let validator = Validator::new(constraints, options_in(&dir));

    let mut env = MapEnv::new();
    assert_eq!(validator.load_and_validate(&mut env), None);
    assert_eq!(env.get("PORT"), Some("8080".to_string()));
}

#[test]
fn test_missing_file_reported_once() {
    let dir = tempdir().unwrap();
    write_env(&dir, ".env", "NAME=app\n");

    let constraints = ConstraintSet::new()
        .with("NAME", Constraint::string().required())
        .unwrap();
    let validator = Validator::new(constraints, options_in(&dir).files([".env", ".env.local"]));

    let mut env = MapEnv::new();
    let errors = validator.load_and_validate(&mut env).unwrap();
    assert_eq!(errors, vec!["Missing env file: .env.local"]);
    assert_eq!(env.get("NAME"), Some("app".to_string()));
}

#[test]
fn test_loader_errors_precede_validation_errors() {
    let dir = tempdir().unwrap();
    write_env(&dir, ".env", "DEBUG=maybe\n");

    let constraints = ConstraintSet::new()
        .with("DEBUG", Constraint::boolean())
        .unwrap()
        .with("TOKEN", Constraint::string().required())
        .unwrap();
    let validator = Validator::new(
        constraints,
        options_in(&dir).files([".env.first", ".env", ".env.second"]),
    );

    let errors = validator.load_and_validate(&mut MapEnv::new()).unwrap();
    assert_eq!(
        errors,
        vec![
            "Missing env file: .env.first",
            "Missing env file: .env.second",
            r#"Invalid boolean for environment variable: DEBUG (got "maybe")"#,
            "Missing required environment variable: TOKEN",
        ]
    );
}

#[test]
fn test_existing_variables_win_over_files() {
    let dir = tempdir().unwrap();
    write_env(&dir, ".env", "MODE=file\nOTHER=file\n");

    let validator = Validator::new(ConstraintSet::new(), options_in(&dir));

    let mut env: MapEnv = [("MODE", "process")].into_iter().collect();
    assert_eq!(validator.load_and_validate(&mut env), None);
    assert_eq!(env.get("MODE"), Some("process".to_string()));
    assert_eq!(env.get("OTHER"), Some("file".to_string()));
}

#[test]
fn test_earlier_files_win_over_later_files() {
    let dir = tempdir().unwrap();
    write_env(&dir, ".env.local", "HOST=local\n");
    write_env(&dir, ".env", "HOST=shared\nPORT=80\n");

    let validator = Validator::new(
        ConstraintSet::new(),
        options_in(&dir).files([".env.local", ".env"]),
    );

    let mut env = MapEnv::new();
    assert_eq!(validator.load_and_validate(&mut env), None);
    assert_eq!(env.get("HOST"), Some("local".to_string()));
    assert_eq!(env.get("PORT"), Some("80".to_string()));
}

#[test]
fn test_computed_file_list_uses_current_environment() {
    let dir = tempdir().unwrap();
    write_env(&dir, ".env.production", "API_URL=https://api.example.com\n");
    write_env(&dir, ".env.development", "API_URL=http://localhost\n");

    let constraints = ConstraintSet::new()
        .with("API_URL", Constraint::string().required().pattern("^https://").unwrap())
        .unwrap();
    let validator = Validator::new(
        constraints,
        options_in(&dir).files_from(|env| {
            let mode = env.get("APP_ENV").unwrap_or_else(|| "development".into());
            vec![format!(".env.{mode}")]
        }),
    );

    let mut env: MapEnv = [("APP_ENV", "production")].into_iter().collect();
    assert_eq!(validator.load_and_validate(&mut env), None);
    assert_eq!(
        env.get("API_URL"),
        Some("https://api.example.com".to_string())
    );

    let mut env = MapEnv::new();
    let errors = validator.load_and_validate(&mut env).unwrap();
    assert_eq!(errors, vec!["Invalid value for environment variable: API_URL"]);
}

#[test]
fn test_malformed_file_is_not_a_missing_file() {
    let dir = tempdir().unwrap();
    write_env(&dir, ".env", "GOOD=1\nnot a valid line\nAFTER=yes\n");

    let constraints = ConstraintSet::new()
        .with("GOOD", Constraint::boolean().required())
        .unwrap()
        .with("AFTER", Constraint::string().required())
        .unwrap();
    let validator = Validator::new(constraints, options_in(&dir));

    let mut env = MapEnv::new();
    assert_eq!(validator.load_and_validate(&mut env), None);
    assert_eq!(env.get("GOOD"), Some("1".to_string()));
    assert_eq!(env.get("AFTER"), Some("yes".to_string()));
}

#[test]
fn test_missing_files_alone_do_not_terminate() {
    let dir = tempdir().unwrap();
    let terminator = Arc::new(RecordingTerminator::new());

    let validator = Validator::new(
        ConstraintSet::new(),
        ValidationOptions::new().base_path(dir.path()).silent(true),
    )
    .with_terminator(terminator.clone());

    let errors = validator.load_and_validate(&mut MapEnv::new()).unwrap();
    assert_eq!(errors, vec!["Missing env file: .env"]);
    assert!(terminator.codes().is_empty());
}

/// Records the paths it was asked to load and sets a marker variable.
#[derive(Default)]
struct RecordingParser {
    paths: Mutex<Vec<String>>,
}

impl EnvFileParser for RecordingParser {
    fn load(&self, path: &Path, env: &mut dyn EnvSnapshot) -> Result<LoadSummary, LoadError> {
        self.paths
            .lock()
            .unwrap()
            .push(path.file_name().unwrap().to_string_lossy().into_owned());
        env.set("LOADED_BY", "recording");
        Ok(LoadSummary {
            applied: 1,
            skipped: Vec::new(),
        })
    }
}

#[test]
fn test_custom_parser_receives_joined_paths() {
    let dir = tempdir().unwrap();
    write_env(&dir, "a.env", "");
    write_env(&dir, "b.env", "");

    let parser = Arc::new(RecordingParser::default());
    let validator = Validator::new(
        ConstraintSet::new(),
        options_in(&dir).files(["a.env", "missing.env", "b.env"]),
    )
    .with_parser(parser.clone());

    let mut env = MapEnv::new();
    let errors = validator.load_and_validate(&mut env).unwrap();

    assert_eq!(errors, vec!["Missing env file: missing.env"]);
    assert_eq!(*parser.paths.lock().unwrap(), vec!["a.env", "b.env"]);
    assert_eq!(env.get("LOADED_BY"), Some("recording".to_string()));
}
