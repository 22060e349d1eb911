//! Collaborators backed by the `docker` command-line client.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

use bubbles_common::error::{BubblesError, Result};
use bubbles_common::types::{ExitCode, ImageName};

use super::{BubbleInventory, ContainerRunner, ImageBuilder, ImageExistenceCheck};

/// Drives a local `docker` binary.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
}

impl DockerCli {
    /// Uses `binary` as-is, without checking that it exists.
    #[must_use]
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Resolves `binary` on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no such executable exists.
    pub fn locate(binary: &str) -> Result<Self> {
        let path = which::which(binary).map_err(|_| BubblesError::NotFound {
            kind: "docker binary",
            id: format!("{binary} (install Docker or set BUBBLES_DOCKER)"),
        })?;
        tracing::debug!(path = %path.display(), "located docker client");
        Ok(Self::new(path))
    }

    fn command(&self) -> Command {
        Command::new(&self.binary)
    }

    fn io_error(&self, source: std::io::Error) -> BubblesError {
        BubblesError::Io {
            path: self.binary.clone(),
            source,
        }
    }

    /// Runs a listing command and returns its non-empty stdout lines.
    fn list(&self, args: &[&str]) -> Result<Vec<String>> {
        tracing::debug!(?args, "listing docker objects");
        let output = self
            .command()
            .args(args)
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| self.io_error(e))?;
        if !output.status.success() {
            return Err(BubblesError::Config {
                message: format!(
                    "docker {} exited with {}",
                    args.join(" "),
                    exit_code(output.status)
                ),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

impl ImageBuilder for DockerCli {
    fn build(&self, image: &ImageName, dockerfile: &str) -> Result<()> {
        tracing::info!(image = %image, "building image");
        let mut child = self
            .command()
            .args(["build", "-t", image.as_str(), "-"])
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| self.io_error(e))?;

        // Dropping stdin closes the pipe so the build sees end of input.
        let written = child
            .stdin
            .take()
            .map_or(Ok(()), |mut stdin| stdin.write_all(dockerfile.as_bytes()));

        let status = child.wait().map_err(|e| self.io_error(e))?;
        if !status.success() {
            return Err(BubblesError::Build {
                image: image.to_string(),
                status: status.code(),
            });
        }
        written.map_err(|e| self.io_error(e))
    }
}

impl ContainerRunner for DockerCli {
    fn run(&self, image: &ImageName, args: &[String]) -> Result<ExitCode> {
        tracing::info!(image = %image, ?args, "running container");
        let status = self
            .command()
            .arg("run")
            .args(args)
            .status()
            .map_err(|e| self.io_error(e))?;
        let code = exit_code(status);
        tracing::debug!(code, "container exited");
        Ok(code)
    }
}

impl ImageExistenceCheck for DockerCli {
    fn exists(&self, image: &ImageName) -> bool {
        self.command()
            .args(["image", "inspect", image.as_str()])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }
}

impl BubbleInventory for DockerCli {
    fn containers(&self, prefix: &str) -> Result<Vec<String>> {
        let filter = format!("name={prefix}");
        self.list(&["ps", "-a", "--filter", &filter, "--format", "{{.Names}}"])
    }

    fn images(&self, prefix: &str) -> Result<Vec<String>> {
        let filter = format!("reference={prefix}*");
        self.list(&["images", "--filter", &filter, "--format", "{{.Repository}}"])
    }

    fn execute(&self, args: &[String]) -> Result<ExitCode> {
        tracing::debug!(?args, "executing docker command");
        let status = self
            .command()
            .args(args)
            .status()
            .map_err(|e| self.io_error(e))?;
        Ok(exit_code(status))
    }
}

/// Exit code of a finished process, using the shell's `128 + signal`
/// convention for processes killed by a signal.
fn exit_code(status: ExitStatus) -> ExitCode {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    status.code().unwrap_or(1)
}
