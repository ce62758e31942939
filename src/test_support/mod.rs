//! Test utilities shared by the unit tests.
//!
//! Provides recording and failing extensions, a fixed mode probe, and
//! on-disk project fixtures.

pub mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Result};

use crate::core::context::ExecutionContext;
use crate::core::mode::{Mode, ModeProbe};
use crate::extension::{BuildHooks, Extension};

pub use fixtures::*;

/// Shared log of extension registrations, in call order.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    entries: Rc<RefCell<Vec<String>>>,
}

impl ExecutionLog {
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }
}

/// Extension that logs its registration and adds a no-op config hook.
#[derive(Debug)]
pub struct RecordingExtension {
    id: String,
    log: ExecutionLog,
}

impl RecordingExtension {
    pub fn new(id: impl Into<String>, log: ExecutionLog) -> Self {
        RecordingExtension {
            id: id.into(),
            log,
        }
    }
}

impl Extension for RecordingExtension {
    fn id(&self) -> &str {
        &self.id
    }

    fn register(&self, _ctx: &ExecutionContext, hooks: &mut BuildHooks) -> Result<()> {
        self.log.record(self.id.as_str());
        hooks.extend_config(&self.id, None, |_, _| Ok(()));
        Ok(())
    }
}

/// Extension whose registration always fails.
#[derive(Debug)]
pub struct FailingExtension {
    id: String,
}

impl FailingExtension {
    pub fn new(id: impl Into<String>) -> Self {
        FailingExtension { id: id.into() }
    }
}

impl Extension for FailingExtension {
    fn id(&self) -> &str {
        &self.id
    }

    fn register(&self, _ctx: &ExecutionContext, _hooks: &mut BuildHooks) -> Result<()> {
        bail!("extension `{}` refused to register", self.id)
    }
}

/// Mode probe answering from a fixed list.
#[derive(Debug, Clone, Default)]
pub struct StaticModeProbe {
    installed: Vec<Mode>,
}

impl StaticModeProbe {
    pub fn new(installed: &[Mode]) -> Self {
        StaticModeProbe {
            installed: installed.to_vec(),
        }
    }
}

impl ModeProbe for StaticModeProbe {
    fn is_installed(&self, mode: Mode) -> bool {
        mode == Mode::Spa || self.installed.contains(&mode)
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    /// Assert that `haystack` contains each needle, in order.
    pub fn assert_in_order(haystack: &str, needles: &[&str]) {
        let mut from = 0;
        for needle in needles {
            match haystack[from..].find(needle) {
                Some(pos) => from += pos + needle.len(),
                None => panic!(
                    "expected '{}' after offset {} in:\n{}",
                    needle, from, haystack
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::BuildKind;

    #[test]
    fn test_execution_log_is_shared() {
        let log = ExecutionLog::default();
        let ext = RecordingExtension::new("a", log.clone());
        let mut hooks = BuildHooks::new();

        ext.register(&ExecutionContext::new(Mode::Spa, BuildKind::Prod), &mut hooks)
            .unwrap();

        assert_eq!(log.entries(), vec!["a"]);
        assert_eq!(hooks.len(), 1);
    }

    #[test]
    fn test_static_probe() {
        let probe = StaticModeProbe::new(&[Mode::Ssr]);
        assert!(probe.is_installed(Mode::Spa));
        assert!(probe.is_installed(Mode::Ssr));
        assert!(!probe.is_installed(Mode::Pwa));
    }

    #[test]
    fn test_assert_in_order() {
        assertions::assert_in_order("client ... server", &["client", "server"]);
    }

    #[test]
    #[should_panic]
    fn test_assert_in_order_rejects_reversed() {
        assertions::assert_in_order("server ... client", &["client", "server"]);
    }
}
