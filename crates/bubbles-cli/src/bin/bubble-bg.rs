//! # bubble-bg
//!
//! The sandbox profile, detached and running under its own name.

use std::process::ExitCode;

use bubbles_cli::commands::profile::{self, Profile};

fn main() -> ExitCode {
    bubbles_cli::init_tracing();
    let args = bubbles_cli::process_args();
    bubbles_cli::output::finish(profile::execute(&Profile::background(), &args))
}
