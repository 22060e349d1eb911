//! Running a bubble profile: parse, compile, then build and run.

use std::io::Write;

use anyhow::Context;
use bubbles_common::config::BubblesConfig;
use bubbles_common::types::ExitCode;
use bubbles_compose::composition::Composition;
use bubbles_compose::context::ExecutionContext;
use bubbles_compose::invocation::{Prepared, prepare};
use bubbles_compose::parser::ClapArgParser;
use bubbles_compose::profiles;
use bubbles_runtime::backend::{self, DockerCli};
use bubbles_runtime::driver::Driver;

use super::load_environment;

/// A composition together with the binary that runs it.
pub struct Profile {
    /// Program name shown in usage text.
    pub bin: &'static str,
    /// One-line description shown in usage text.
    pub about: &'static str,
    /// Components making up the bubble.
    pub composition: Composition,
}

impl Profile {
    /// The interactive sandbox run by `bubble`.
    #[must_use]
    pub fn sandbox() -> Self {
        Self {
            bin: "bubble",
            about: "Run the current directory inside a disposable Node container",
            composition: profiles::sandbox(),
        }
    }

    /// The detached sandbox run by `bubble-bg`.
    #[must_use]
    pub fn background() -> Self {
        Self {
            bin: "bubble-bg",
            about: "Run the current directory inside a detached Node container",
            composition: profiles::background(),
        }
    }
}

/// Runs `profile` with the process arguments and returns the exit code.
///
/// # Errors
///
/// Returns an error for configuration, composition, parse, and build
/// failures. A failing container is not an error; its exit code is returned.
pub fn execute(profile: &Profile, args: &[String]) -> anyhow::Result<ExitCode> {
    let (context, config) = load_environment()?;
    let mut stdout = std::io::stdout().lock();
    execute_in(profile, args, &context, &config, &mut stdout)
}

/// Runs `profile` against an explicit context, writing help and dry-run
/// output to `out`.
///
/// # Errors
///
/// See [`execute`].
pub fn execute_in(
    profile: &Profile,
    args: &[String],
    context: &ExecutionContext,
    config: &BubblesConfig,
    out: &mut dyn Write,
) -> anyhow::Result<ExitCode> {
    let parser = ClapArgParser::new(profile.bin).about(profile.about);
    let (plan, flags) = match prepare(&profile.composition, &parser, args, context, config)? {
        Prepared::Help(text) => {
            write!(out, "{text}").context("failed to print usage")?;
            return Ok(0);
        }
        Prepared::Plan { plan, flags } => (plan, flags),
    };
    tracing::info!(
        container = %plan.container,
        image = %plan.image,
        rebuild = flags.rebuild,
        dry_run = flags.dry_run,
        "plan compiled"
    );

    let docker = if flags.dry_run {
        DockerCli::new(&config.docker_binary)
    } else {
        backend::detect_backend(config)?
    };

    if !flags.dry_run {
        // The container shares our process group and handles Ctrl+C itself.
        ctrlc::set_handler(|| tracing::debug!("interrupt received while container runs"))
            .context("failed to install interrupt handler")?;
    }

    let driver = Driver::new(&docker, &docker, &docker, config.docker_binary.as_str());
    let code = driver.execute(&plan, flags, out)?;
    Ok(code)
}
