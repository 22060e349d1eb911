//! Domain primitive types used across the bubbles workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name given to a bubble container (`bubble-<name>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerName(String);

impl ContainerName {
    /// Creates a container name from a string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derives the container name for a bubble by prepending `prefix`.
    #[must_use]
    pub fn for_bubble(prefix: &str, bubble: &str) -> Self {
        Self(format!("{prefix}{bubble}"))
    }

    /// Returns the image name paired with this container.
    #[must_use]
    pub fn image(&self, suffix: &str) -> ImageName {
        ImageName(format!("{}{suffix}", self.0))
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag of a locally built bubble image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImageName(String);

impl ImageName {
    /// Creates an image name from a string value.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Exit status reported by a process the tool spawned.
pub type ExitCode = i32;
