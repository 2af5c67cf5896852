//! Validation options
//!
//! Options are resolved once: [`ValidationOptions::default`] supplies every
//! value and the builder methods override individual fields before the
//! options are handed to a [`Validator`](super::Validator).

use crate::env::EnvSnapshot;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default env file name
pub const DEFAULT_ENV_FILE: &str = ".env";

type FileSelector = dyn Fn(&dyn EnvSnapshot) -> Vec<String> + Send + Sync;

/// Which env files to load, relative to the base path
#[derive(Clone)]
pub enum EnvFiles {
    /// Fixed list, loaded in order
    List(Vec<String>),
    /// Computed from the environment at load time
    Computed(Arc<FileSelector>),
}

impl EnvFiles {
    /// Build a computed file list.
    ///
    /// The selector is called once per load with the snapshot as it is
    /// before any file has been read, so it can branch on variables that
    /// are already set (for example picking `.env.production`).
    pub fn computed<F>(selector: F) -> Self
    where
        F: Fn(&dyn EnvSnapshot) -> Vec<String> + Send + Sync + 'static,
    {
        EnvFiles::Computed(Arc::new(selector))
    }

    /// Resolve to the concrete list of file names.
    pub fn resolve(&self, env: &dyn EnvSnapshot) -> Vec<String> {
        match self {
            EnvFiles::List(files) => files.clone(),
            EnvFiles::Computed(selector) => selector(env),
        }
    }
}

impl Default for EnvFiles {
    fn default() -> Self {
        EnvFiles::List(vec![DEFAULT_ENV_FILE.to_string()])
    }
}

impl fmt::Debug for EnvFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvFiles::List(files) => f.debug_tuple("List").field(files).finish(),
            EnvFiles::Computed(_) => f.write_str("Computed(<fn>)"),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for EnvFiles {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        EnvFiles::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Fully resolved validation options
#[derive(Debug, Clone)]
pub struct ValidationOptions {
    /// Directory env file names are joined onto
    pub base_path: PathBuf,

    /// Env files to load
    pub files: EnvFiles,

    /// Terminate the process with status 1 when validation fails
    pub exit_on_error: bool,

    /// Write declared defaults for unset variables into the environment
    pub apply_defaults: bool,

    /// Suppress warning and error log output
    pub silent: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            // falls back to a relative base if the cwd is gone
            base_path: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            files: EnvFiles::default(),
            exit_on_error: true,
            apply_defaults: false,
            silent: false,
        }
    }
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_path(mut self, path: impl AsRef<Path>) -> Self {
        self.base_path = path.as_ref().to_path_buf();
        self
    }

    pub fn files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().collect();
        self
    }

    pub fn files_from<F>(mut self, selector: F) -> Self
    where
        F: Fn(&dyn EnvSnapshot) -> Vec<String> + Send + Sync + 'static,
    {
        self.files = EnvFiles::computed(selector);
        self
    }

    pub fn exit_on_error(mut self, enabled: bool) -> Self {
        self.exit_on_error = enabled;
        self
    }

    pub fn apply_defaults(mut self, enabled: bool) -> Self {
        self.apply_defaults = enabled;
        self
    }

    pub fn silent(mut self, enabled: bool) -> Self {
        self.silent = enabled;
        self
    }
}
