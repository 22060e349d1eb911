//! # bubble-burst
//!
//! Stops and removes the containers and images left by the other tools.

use std::process::ExitCode;

use clap::Parser;

use bubbles_cli::commands::burst::{self, BurstArgs};

fn main() -> ExitCode {
    bubbles_cli::init_tracing();
    let args = BurstArgs::parse();
    bubbles_cli::output::finish(burst::execute(&args))
}
