//! Marina - build configuration inspection
//!
//! This crate resolves a project's `marina.config.toml` into one bundler
//! configuration per build target and renders those configurations for
//! humans.

pub mod builder;
pub mod core;
pub mod extension;
pub mod inspect;
pub mod ops;
pub mod util;

/// Test utilities for Marina unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides recording extensions, a fixed mode probe and
/// on-disk project fixtures.
#[cfg(test)]
pub mod test_support;

pub use core::{CompiledConfig, ExecutionContext, Mode, Target, Value};
pub use ops::{InspectCommand, InspectError, InspectOptions};
pub use util::context::GlobalContext;
