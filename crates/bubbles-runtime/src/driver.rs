//! Execution driver: turns a compiled plan into a build and a run.

use std::io::Write;

use bubbles_common::error::{BubblesError, Result};
use bubbles_common::types::ExitCode;
use bubbles_compose::compile::BuildPlan;
use bubbles_compose::parser::RunFlags;

use crate::backend::{ContainerRunner, ImageBuilder, ImageExistenceCheck};

/// Notice printed before an implicit build.
pub const IMAGE_NOT_FOUND: &str = "Image not found. Building...";

/// Decides between dry run, build, and run for one invocation.
///
/// All side effects go through the three collaborators, so the driver can
/// be exercised without a Docker daemon.
pub struct Driver<'a> {
    builder: &'a dyn ImageBuilder,
    runner: &'a dyn ContainerRunner,
    images: &'a dyn ImageExistenceCheck,
    docker: String,
}

impl<'a> Driver<'a> {
    /// Creates a driver over the given collaborators. `docker` is the
    /// program name shown in dry-run output.
    #[must_use]
    pub fn new(
        builder: &'a dyn ImageBuilder,
        runner: &'a dyn ContainerRunner,
        images: &'a dyn ImageExistenceCheck,
        docker: impl Into<String>,
    ) -> Self {
        Self {
            builder,
            runner,
            images,
            docker: docker.into(),
        }
    }

    /// Executes `plan` according to `flags`.
    ///
    /// With `dry_run` the Dockerfile and the equivalent `docker run` line
    /// are written to `out` and nothing else happens. Otherwise the image
    /// is built when `rebuild` is set or it does not exist yet, and the
    /// container is run in the foreground.
    ///
    /// # Errors
    ///
    /// Returns a build error if the image build fails (the container is
    /// not run), or an I/O error if the collaborators cannot be started or
    /// `out` cannot be written.
    pub fn execute(
        &self,
        plan: &BuildPlan,
        flags: RunFlags,
        out: &mut dyn Write,
    ) -> Result<ExitCode> {
        if flags.dry_run {
            tracing::debug!(image = %plan.image, "dry run");
            self.print_plan(plan, out)?;
            return Ok(0);
        }

        if flags.rebuild {
            tracing::info!(image = %plan.image, "rebuild requested");
            self.builder.build(&plan.image, &plan.dockerfile)?;
        } else if !self.images.exists(&plan.image) {
            writeln!(out, "{IMAGE_NOT_FOUND}").map_err(stdout_error)?;
            self.builder.build(&plan.image, &plan.dockerfile)?;
        } else {
            tracing::debug!(image = %plan.image, "image present, skipping build");
        }

        let code = self.runner.run(&plan.image, &plan.run_args)?;
        tracing::info!(container = %plan.container, code, "bubble finished");
        Ok(code)
    }

    fn print_plan(&self, plan: &BuildPlan, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "# Dockerfile ({})", plan.image)
            .and_then(|()| writeln!(out, "{}", plan.dockerfile))
            .and_then(|()| writeln!(out))
            .and_then(|()| writeln!(out, "# Run"))
            .and_then(|()| writeln!(out, "{}", plan.run_command_line(&self.docker)))
            .map_err(stdout_error)
    }
}

fn stdout_error(source: std::io::Error) -> BubblesError {
    BubblesError::Io {
        path: "<stdout>".into(),
        source,
    }
}
