//! Execution context shared by extensions and the config resolver.

use crate::core::mode::Mode;

/// Whether the pipeline is producing a development or production build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildKind {
    Dev,
    Prod,
}

/// Immutable description of one invocation.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    mode: Mode,
    target: Option<String>,
    debug: bool,
    kind: BuildKind,
}

impl ExecutionContext {
    pub fn new(mode: Mode, kind: BuildKind) -> Self {
        ExecutionContext {
            mode,
            target: None,
            debug: false,
            kind,
        }
    }

    /// Set the debug flag.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the platform target (e.g. for packaged desktop builds).
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn kind(&self) -> BuildKind {
        self.kind
    }

    pub fn dev(&self) -> bool {
        self.kind == BuildKind::Dev
    }

    pub fn prod(&self) -> bool {
        self.kind == BuildKind::Prod
    }
}
