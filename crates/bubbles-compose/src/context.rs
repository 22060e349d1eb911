//! Snapshot of the host environment handed to component handlers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bubbles_common::error::{BubblesError, Result};

/// Host state a handler may depend on.
///
/// Handlers read the working directory, home directory, and environment
/// from here instead of the process globals, which keeps merging pure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Directory the tool was started from.
    pub cwd: PathBuf,
    /// Home directory of the invoking user, if known.
    pub home: Option<PathBuf>,
    /// Environment variables at startup.
    pub env: BTreeMap<String, String>,
}

impl ExecutionContext {
    /// Creates a context with an explicit working directory and home.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home,
            env: BTreeMap::new(),
        }
    }

    /// Captures the current process state.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn capture() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| BubblesError::Io {
            path: PathBuf::from("."),
            source: e,
        })?;
        let env: BTreeMap<String, String> = std::env::vars().collect();
        let home = env
            .get("HOME")
            .or_else(|| env.get("USERPROFILE"))
            .map(PathBuf::from);
        Ok(Self { cwd, home, env })
    }

    /// Returns the home directory, if known.
    #[must_use]
    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_reads_current_directory() {
        let ctx = ExecutionContext::capture().expect("capture");
        assert!(ctx.cwd.is_absolute());
    }

    #[test]
    fn explicit_context_has_no_home_or_env() {
        let ctx = ExecutionContext::new("/work", None);
        assert!(ctx.env.is_empty());
        assert_eq!(ctx.home(), None);
    }
}
