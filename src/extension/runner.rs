//! Ordered registry of build extensions.

use crate::core::context::ExecutionContext;
use crate::extension::{BuildHooks, Extension};
use crate::ops::errors::InspectError;

/// Extensions in the order they were added.
///
/// Construction never fails and runs nothing; extensions only execute in
/// [`ExtensionRunner::register_extensions`].
#[derive(Default)]
pub struct ExtensionRunner {
    extensions: Vec<Box<dyn Extension>>,
}

impl ExtensionRunner {
    pub fn new() -> Self {
        ExtensionRunner::default()
    }

    /// Append an extension.
    pub fn register(&mut self, extension: Box<dyn Extension>) {
        self.extensions.push(extension);
    }

    /// Remove the extension with `id`.
    ///
    /// Returns `false` if no such extension is registered.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.extensions.iter().position(|e| e.id() == id) {
            Some(index) => {
                self.extensions.remove(index);
                true
            }
            None => false,
        }
    }

    /// Registered identifiers, in order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.extensions.iter().map(|e| e.id())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids().any(|e| e == id)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Run every extension's registration, in order.
    ///
    /// The first failure aborts the remaining registrations.
    pub fn register_extensions(&self, ctx: &ExecutionContext) -> Result<BuildHooks, InspectError> {
        let mut hooks = BuildHooks::new();

        for extension in &self.extensions {
            let id = extension.id();
            tracing::debug!("registering extension `{}`", id);

            extension
                .register(ctx, &mut hooks)
                .map_err(|source| InspectError::ExtensionRegistration {
                    id: id.to_string(),
                    source,
                })?;
        }

        Ok(hooks)
    }
}

impl std::fmt::Debug for ExtensionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.ids()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::BuildKind;
    use crate::core::mode::Mode;
    use crate::test_support::{ExecutionLog, FailingExtension, RecordingExtension};

    fn ctx() -> ExecutionContext {
        ExecutionContext::new(Mode::Ssg, BuildKind::Prod)
    }

    fn runner(log: &ExecutionLog, ids: &[&str]) -> ExtensionRunner {
        let mut runner = ExtensionRunner::new();
        for id in ids {
            runner.register(Box::new(RecordingExtension::new(*id, log.clone())));
        }
        runner
    }

    #[test]
    fn test_extensions_run_in_registration_order() {
        let log = ExecutionLog::default();
        let runner = runner(&log, &["a", "b", "c"]);

        runner.register_extensions(&ctx()).unwrap();

        assert_eq!(log.entries(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_excludes_exactly_one() {
        let log = ExecutionLog::default();
        let mut runner = runner(&log, &["a", "ssg", "b", "c"]);

        assert!(runner.remove("ssg"));
        assert!(!runner.contains("ssg"));
        assert_eq!(runner.ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);

        runner.register_extensions(&ctx()).unwrap();
        assert_eq!(log.entries(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let log = ExecutionLog::default();
        let mut runner = runner(&log, &["a"]);

        assert!(!runner.remove("ssg"));
        assert_eq!(runner.len(), 1);
    }

    #[test]
    fn test_failure_aborts_remaining() {
        let log = ExecutionLog::default();
        let mut runner = runner(&log, &["a"]);
        runner.register(Box::new(FailingExtension::new("broken")));
        runner.register(Box::new(RecordingExtension::new("c", log.clone())));

        let err = runner.register_extensions(&ctx()).unwrap_err();

        assert!(matches!(
            err,
            InspectError::ExtensionRegistration { ref id, .. } if id == "broken"
        ));
        assert_eq!(log.entries(), vec!["a"]);
    }

    #[test]
    fn test_registered_hooks_are_returned() {
        let log = ExecutionLog::default();
        let runner = runner(&log, &["a", "b"]);

        let hooks = runner.register_extensions(&ctx()).unwrap();
        assert_eq!(hooks.len(), 2);
    }
}
