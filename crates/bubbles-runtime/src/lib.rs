//! Execution side of the bubbles tools: the Docker collaborators, the
//! driver deciding between build, run, and dry run, and bubble cleanup.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod backend;
pub mod cleanup;
pub mod driver;
