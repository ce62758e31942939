//! Build extensions and the hooks they register.
//!
//! Registration is a discrete phase: every extension runs once, in order,
//! before the configuration is resolved. What an extension leaves behind is a
//! set of [`BuildHooks`] that the resolver applies while attaching bundler
//! configurations.

pub mod manifest;
pub mod runner;

use anyhow::Result;

use crate::core::context::ExecutionContext;
use crate::core::mode::Target;
use crate::core::value::Value;
use crate::ops::errors::InspectError;

pub use manifest::{ManifestExtension, EXTENSIONS_FILENAME};
pub use runner::ExtensionRunner;

/// A build extension.
pub trait Extension {
    /// Unique identifier (e.g. "ssg", "markdown").
    fn id(&self) -> &str;

    /// Register build hooks for this invocation.
    fn register(&self, ctx: &ExecutionContext, hooks: &mut BuildHooks) -> Result<()>;
}

type ConfigHookFn = Box<dyn Fn(Target, &Value) -> Result<()>>;

/// A hook that edits a generated bundler tree.
struct ConfigHook {
    extension: String,
    targets: Option<Vec<Target>>,
    apply: ConfigHookFn,
}

/// Hooks registered by extensions, kept in registration order.
#[derive(Default)]
pub struct BuildHooks {
    config_hooks: Vec<ConfigHook>,
}

impl BuildHooks {
    pub fn new() -> Self {
        BuildHooks::default()
    }

    /// Register a hook run on the bundler tree of each target in `targets`
    /// (every target when `None`).
    pub fn extend_config<F>(&mut self, extension: &str, targets: Option<Vec<Target>>, hook: F)
    where
        F: Fn(Target, &Value) -> Result<()> + 'static,
    {
        self.config_hooks.push(ConfigHook {
            extension: extension.to_string(),
            targets,
            apply: Box::new(hook),
        });
    }

    /// Run the config hooks that apply to `target`, in registration order.
    pub fn apply(&self, target: Target, tree: &Value) -> Result<(), InspectError> {
        for hook in &self.config_hooks {
            if let Some(targets) = &hook.targets {
                if !targets.contains(&target) {
                    continue;
                }
            }
            tracing::debug!("applying config hook from `{}` to {}", hook.extension, target);
            (hook.apply)(target, tree).map_err(|source| InspectError::ConfigHook {
                extension: hook.extension.clone(),
                target,
                source,
            })?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.config_hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.config_hooks.is_empty()
    }
}

impl std::fmt::Debug for BuildHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.config_hooks.iter().map(|h| &h.extension))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::ObjectRef;

    #[test]
    fn test_hooks_run_in_order_for_matching_targets() {
        let mut hooks = BuildHooks::new();
        hooks.extend_config("first", None, |_, tree| {
            tree.as_object().unwrap().set("order", "first");
            Ok(())
        });
        hooks.extend_config("second", Some(vec![Target::Server]), |_, tree| {
            tree.as_object().unwrap().set("order", "second");
            Ok(())
        });

        let client: Value = ObjectRef::new().into();
        let server: Value = ObjectRef::new().into();
        hooks.apply(Target::Client, &client).unwrap();
        hooks.apply(Target::Server, &server).unwrap();

        assert_eq!(client.as_object().unwrap().get("order"), Some("first".into()));
        assert_eq!(server.as_object().unwrap().get("order"), Some("second".into()));
    }

    #[test]
    fn test_hook_failure_names_extension() {
        let mut hooks = BuildHooks::new();
        hooks.extend_config("broken", None, |_, _| anyhow::bail!("nope"));

        let err = hooks.apply(Target::Client, &Value::object()).unwrap_err();
        match err {
            InspectError::ConfigHook {
                extension, target, ..
            } => {
                assert_eq!(extension, "broken");
                assert_eq!(target, Target::Client);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
