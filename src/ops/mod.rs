//! High-level operations.
//!
//! This module contains the implementation of Marina commands.

pub mod errors;
pub mod host;
pub mod inspect;
pub mod legacy;
pub mod resolve;

pub use errors::InspectError;
pub use host::{HostCapabilities, HostEnvironment};
pub use inspect::{print_entries, InspectCommand, InspectOptions, InspectReport};
pub use legacy::{DirectiveManifest, LegacyDirectives};
pub use resolve::{ConfigResolver, ResolverStage};
