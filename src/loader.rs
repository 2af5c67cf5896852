//! Env file loading
//!
//! Resolves the configured file list against the base path, merges every file
//! that exists into the environment snapshot and then runs validation.
//! Missing files are reported as errors ahead of the validation errors but do
//! not stop the remaining files from loading.

use crate::env::EnvSnapshot;
use crate::error::LoadError;
use crate::validator::{ErrorList, Validator};
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of reading one env file
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Variables written into the snapshot
    pub applied: usize,
    /// Lines that could not be parsed and were skipped
    pub skipped: Vec<LoadError>,
}

/// Reads a `.env` file into an environment snapshot.
pub trait EnvFileParser: Send + Sync {
    /// Merge the variables in `path` into `env`.
    ///
    /// `Err` means the file could not be read at all; malformed lines are
    /// reported in [`LoadSummary::skipped`].
    fn load(&self, path: &Path, env: &mut dyn EnvSnapshot) -> Result<LoadSummary, LoadError>;
}

/// `dotenvy`-backed parser.
///
/// Follows `dotenvy::dotenv()` precedence: a variable already present in the
/// snapshot is never overwritten, so earlier files win over later ones and the
/// existing environment wins over all files. Variable substitution inside the
/// file (`${OTHER}`) is handled by `dotenvy` against the process environment
/// and earlier lines of the same file.
///
/// Malformed lines are skipped and parsing continues with the next line. A
/// read error mid-file stops at that point, keeping what was applied.
#[derive(Debug, Default, Clone, Copy)]
pub struct DotenvParser;

impl EnvFileParser for DotenvParser {
    fn load(&self, path: &Path, env: &mut dyn EnvSnapshot) -> Result<LoadSummary, LoadError> {
        let iter = dotenvy::from_path_iter(path).map_err(|e| LoadError::from_dotenv(path, e))?;

        let mut summary = LoadSummary::default();
        for item in iter {
            let (key, value) = match item {
                Ok(pair) => pair,
                Err(dotenvy::Error::Io(source)) => {
                    summary.skipped.push(LoadError::Io {
                        path: path.to_path_buf(),
                        source,
                    });
                    break;
                }
                Err(e) => {
                    summary.skipped.push(LoadError::from_dotenv(path, e));
                    continue;
                }
            };
            if env.contains(&key) {
                continue;
            }
            env.set(&key, &value);
            summary.applied += 1;
        }
        Ok(summary)
    }
}

impl Validator {
    /// Load the configured env files into `env`, then [`validate`](Self::validate).
    ///
    /// The returned list holds one `Missing env file: <file>` entry per file
    /// that does not exist, in file order, followed by the validation errors.
    /// `None` means every file was found and validation passed (or the
    /// process was told to terminate).
    pub fn load_and_validate(&self, env: &mut dyn EnvSnapshot) -> Option<ErrorList> {
        let mut errors = self.load_files(env);

        if let Some(validation_errors) = self.validate(env) {
            errors.extend(validation_errors);
        }

        if errors.is_empty() {
            None
        } else {
            Some(errors)
        }
    }

    /// Merge env files into `env`, returning the missing-file errors.
    pub fn load_files(&self, env: &mut dyn EnvSnapshot) -> ErrorList {
        let mut errors = Vec::new();
        let files = self.options.files.resolve(env);

        for file in &files {
            let path = self.options.base_path.join(file);

            if !path.exists() {
                if !self.options.silent {
                    warn!("Warning: Missing env file: {}", file);
                }
                errors.push(format!("Missing env file: {file}"));
                continue;
            }

            match self.parser.load(&path, env) {
                Ok(summary) => {
                    debug!(
                        file = %path.display(),
                        applied = summary.applied,
                        skipped = summary.skipped.len(),
                        "Loaded env file"
                    );
                    if !self.options.silent {
                        for e in &summary.skipped {
                            warn!(error = %e, "Skipped line in env file");
                        }
                    }
                }
                Err(e) => {
                    if !self.options.silent {
                        warn!(error = %e, "Failed to read env file");
                    }
                }
            }
        }

        errors
    }
}
