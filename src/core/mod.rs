//! Core data structures for Marina.
//!
//! This module contains the foundational types used throughout Marina:
//! - Build modes, targets and the execution context
//! - The configuration descriptor and its compiled form
//! - The value model bundler trees are built from

pub mod compiled;
pub mod context;
pub mod descriptor;
pub mod mode;
pub mod value;

pub use compiled::{BuildSettings, BundlerTrees, CompiledConfig};
pub use context::{BuildKind, ExecutionContext};
pub use descriptor::{ConfigDescriptor, DescriptorError, DESCRIPTOR_FILENAME};
pub use mode::{FsModeProbe, Mode, ModeProbe, Target};
pub use value::{ArrayRef, NodeId, ObjectRef, Value};
