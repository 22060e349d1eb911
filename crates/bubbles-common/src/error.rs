//! Unified error type for the bubbles workspace.
//!
//! Composition, parse, and build failures all land here so the binaries can
//! report them the same way. A container's own exit code is not an error and
//! never goes through this type.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum BubblesError {
    /// Two components declare an option with the same name.
    #[error("duplicate option --{name}: declared by \"{first}\" and \"{second}\"")]
    DuplicateOption {
        /// Option name without leading dashes.
        name: String,
        /// Component that declared the option first.
        first: String,
        /// Component that declared it again.
        second: String,
    },

    /// A component declares an option name owned by the framework.
    #[error("option --{name} declared by \"{component}\" is reserved")]
    ReservedOption {
        /// Option name without leading dashes.
        name: String,
        /// Offending component id.
        component: String,
    },

    /// Two contributions set the same single-use Dockerfile directive.
    #[error("{directive} is already set by \"{first}\", \"{second}\" cannot set it again")]
    ConflictingDirective {
        /// Directive keyword, e.g. `CMD`.
        directive: String,
        /// Component that set the directive first.
        first: String,
        /// Component that tried to set it again.
        second: String,
    },

    /// A declared option received a value it cannot accept.
    #[error("invalid value \"{value}\" for --{option}: {reason}")]
    InvalidValue {
        /// Option name without leading dashes.
        option: String,
        /// Raw value as given on the command line.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Command-line arguments could not be parsed.
    #[error("{message}")]
    Parse {
        /// Parser diagnostic, naming the offending flag.
        message: String,
    },

    /// The external image build failed.
    #[error("failed to build image {image}{}", status_suffix(.status))]
    Build {
        /// Image that was being built.
        image: String,
        /// Exit status of the build process, if it exited normally.
        status: Option<i32>,
    },

    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path or program where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

impl BubblesError {
    /// Returns whether the error comes from assembling the composition.
    #[must_use]
    pub const fn is_composition(&self) -> bool {
        matches!(
            self,
            Self::DuplicateOption { .. }
                | Self::ReservedOption { .. }
                | Self::ConflictingDirective { .. }
        )
    }
}

fn status_suffix(status: &Option<i32>) -> String {
    status.map_or_else(String::new, |s| format!(" (exit status {s})"))
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BubblesError>;
