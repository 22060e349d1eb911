//! Collaborator interfaces the driver and cleanup talk to.
//!
//! The only implementation shipped is the `docker` command-line client;
//! tests substitute their own.

pub mod docker;

use bubbles_common::config::BubblesConfig;
use bubbles_common::error::Result;
use bubbles_common::types::{ExitCode, ImageName};

pub use docker::DockerCli;

/// Builds an image from Dockerfile text.
pub trait ImageBuilder {
    /// Builds and tags `image`.
    ///
    /// # Errors
    ///
    /// Returns a build error if the build process exits unsuccessfully, or
    /// an I/O error if it cannot be started.
    fn build(&self, image: &ImageName, dockerfile: &str) -> Result<()>;
}

/// Runs a container in the foreground, sharing the terminal.
pub trait ContainerRunner {
    /// Runs `docker run <args>` and returns the container's exit code.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be started; a nonzero
    /// exit code is a normal result.
    fn run(&self, image: &ImageName, args: &[String]) -> Result<ExitCode>;
}

/// Checks whether an image is already present locally.
pub trait ImageExistenceCheck {
    /// Returns whether `image` exists.
    fn exists(&self, image: &ImageName) -> bool;
}

/// Lists and removes the containers and images bubbles left behind.
pub trait BubbleInventory {
    /// Names of all containers, running or not, whose name contains `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing command cannot be run.
    fn containers(&self, prefix: &str) -> Result<Vec<String>>;

    /// Repositories of all images whose reference starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing command cannot be run.
    fn images(&self, prefix: &str) -> Result<Vec<String>>;

    /// Runs `docker <args>` with inherited output and returns its exit code.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be started.
    fn execute(&self, args: &[String]) -> Result<ExitCode>;
}

/// Locates the docker client named in `config`.
///
/// # Errors
///
/// Returns an error if the binary cannot be found on `PATH`.
pub fn detect_backend(config: &BubblesConfig) -> Result<DockerCli> {
    DockerCli::locate(&config.docker_binary)
}
