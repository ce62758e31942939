//! Bundler configuration generation.
//!
//! This module turns a compiled configuration into per-target bundler trees
//! and splits them back out for presentation.

pub mod bundler;
pub mod split;

pub use bundler::{build_targets, generate};
pub use split::{split, NamedConfigEntry};
