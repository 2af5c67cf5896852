//! Process termination.
//!
//! Failing validation with `exit_on_error` ends the process. The exit goes
//! through a [`Terminator`] so tests can record it instead.

use std::sync::Mutex;

/// Ends the process with a status code.
pub trait Terminator: Send + Sync {
    /// Terminate with `code`. Real implementations do not return.
    fn terminate(&self, code: i32);
}

/// Calls [`std::process::exit`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessTerminator;

impl Terminator for ProcessTerminator {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Records requested exit codes without exiting.
#[derive(Debug, Default)]
pub struct RecordingTerminator {
    codes: Mutex<Vec<i32>>,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit codes requested so far, oldest first.
    pub fn codes(&self) -> Vec<i32> {
        self.codes
            .lock()
            .map(|codes| codes.clone())
            .unwrap_or_default()
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        if let Ok(mut codes) = self.codes.lock() {
            codes.push(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_terminator() {
        let terminator = RecordingTerminator::new();
        assert!(terminator.codes().is_empty());
        terminator.terminate(1);
        terminator.terminate(2);
        assert_eq!(terminator.codes(), vec![1, 2]);
    }
}
