//! # bubbles-compose
//!
//! The composition model behind every bubble.
//!
//! Handles:
//! - **Composition**: ordered component lists and variant derivation.
//! - **Parser**: non-strict parsing against the options components declare.
//! - **Merge**: folding partial configurations in component order.
//! - **Compile**: turning the merged configuration into a Dockerfile and
//!   `docker run` arguments.
//! - **Components**: the built-in component catalogue and profiles.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod compile;
pub mod component;
pub mod components;
pub mod composition;
pub mod context;
pub mod invocation;
pub mod merge;
pub mod option;
pub mod parser;
pub mod profiles;
pub mod transform;
