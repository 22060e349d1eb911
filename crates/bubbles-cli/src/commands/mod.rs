//! The commands behind each binary.

pub mod burst;
pub mod profile;

use anyhow::Context;
use bubbles_common::config::BubblesConfig;
use bubbles_compose::context::ExecutionContext;

/// Captures the invocation context and loads the configuration it points at.
///
/// # Errors
///
/// Returns an error if the working directory is unreadable or a
/// configuration file cannot be loaded.
pub fn load_environment() -> anyhow::Result<(ExecutionContext, BubblesConfig)> {
    let context = ExecutionContext::capture().context("failed to capture execution context")?;
    let config = BubblesConfig::load(&context.env, context.home())
        .context("failed to load configuration")?;
    tracing::debug!(?config, cwd = %context.cwd.display(), "environment loaded");
    Ok((context, config))
}
