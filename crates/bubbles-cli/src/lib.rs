//! Shared entry points for the `bubble`, `bubble-bg` and `bubble-burst`
//! binaries.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod commands;
pub mod output;

/// Installs the `tracing` subscriber, filtered by `RUST_LOG` and writing to
/// stderr so dry-run output on stdout stays clean.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Process arguments without the program name.
#[must_use]
pub fn process_args() -> Vec<String> {
    std::env::args_os()
        .skip(1)
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}
