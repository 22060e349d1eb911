//! One pass from raw arguments to a build plan.

use bubbles_common::config::BubblesConfig;
use bubbles_common::error::Result;

use crate::compile::BuildPlan;
use crate::composition::Composition;
use crate::context::ExecutionContext;
use crate::merge::merge;
use crate::parser::{ArgParser, ParseOutcome, RunFlags};

/// What the caller should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    /// Print the usage text and exit successfully.
    Help(String),
    /// Hand the plan to the execution driver.
    Plan {
        /// Compiled Dockerfile and run arguments.
        plan: BuildPlan,
        /// Registry-level flags.
        flags: RunFlags,
    },
}

/// Collects options, parses `args`, merges every component, and compiles
/// the result.
///
/// # Errors
///
/// Returns a composition error for duplicate options or conflicting
/// directives, or a parse error for malformed option values.
pub fn prepare(
    composition: &Composition,
    parser: &dyn ArgParser,
    args: &[String],
    context: &ExecutionContext,
    config: &BubblesConfig,
) -> Result<Prepared> {
    let options = composition.options()?;
    let parsed = match parser.parse(&options, args)? {
        ParseOutcome::Help(text) => return Ok(Prepared::Help(text)),
        ParseOutcome::Parsed(parsed) => parsed,
    };
    let merged = merge(composition, &parsed, &options, context)?;
    Ok(Prepared::Plan {
        plan: BuildPlan::compile(&merged, &parsed.positionals, config),
        flags: parsed.flags(),
    })
}
