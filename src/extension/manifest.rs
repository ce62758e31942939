//! Extensions declared in the project's `marina.extensions.json`.
//!
//! The manifest is an object of extension id to options, in install order:
//!
//! ```json
//! {
//!   "ssg": {},
//!   "markdown": {
//!     "targets": ["client", "server"],
//!     "chain": {
//!       "resolve.alias.md": "src/markdown",
//!       "module.rules[4]": { "test": "\\.md$", "loader": "markdown-loader" }
//!     }
//!   }
//! }
//! ```
//!
//! `chain` entries are written into each selected bundler tree. `modes`
//! restricts the extension to some build modes. Other keys belong to the
//! extension itself and are ignored here.

use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::core::context::ExecutionContext;
use crate::core::mode::{Mode, Target};
use crate::core::value::Value;
use crate::extension::{BuildHooks, Extension, ExtensionRunner};
use crate::inspect::path::{self, Segment};

/// File name of the extension manifest in the project root.
pub const EXTENSIONS_FILENAME: &str = "marina.extensions.json";

/// The part of an extension's options this crate understands.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChainOptions {
    targets: Option<Vec<Target>>,
    modes: Option<Vec<Mode>>,
    chain: IndexMap<String, serde_json::Value>,
}

/// An extension described by its manifest entry.
#[derive(Debug, Clone)]
pub struct ManifestExtension {
    id: String,
    options: serde_json::Value,
}

impl ManifestExtension {
    pub fn new(id: impl Into<String>, options: serde_json::Value) -> Self {
        ManifestExtension {
            id: id.into(),
            options,
        }
    }

    fn chain_options(&self) -> Result<ChainOptions> {
        match &self.options {
            serde_json::Value::Null => Ok(ChainOptions::default()),
            serde_json::Value::Object(_) => serde_json::from_value(self.options.clone())
                .context("invalid extension options"),
            other => bail!("options must be an object, found {}", json_kind(other)),
        }
    }
}

impl Extension for ManifestExtension {
    fn id(&self) -> &str {
        &self.id
    }

    fn register(&self, ctx: &ExecutionContext, hooks: &mut BuildHooks) -> Result<()> {
        let options = self.chain_options()?;

        if let Some(modes) = &options.modes {
            if !modes.contains(&ctx.mode()) {
                tracing::debug!("extension `{}` skipped for mode {}", self.id, ctx.mode());
                return Ok(());
            }
        }

        if options.chain.is_empty() {
            return Ok(());
        }

        let mut patches: Vec<(String, Vec<Segment>, serde_json::Value)> = Vec::new();
        for (raw, value) in options.chain {
            let segments = path::parse(&raw);
            if segments.is_empty() {
                bail!("chain path `{}` is empty", raw);
            }
            patches.push((raw, segments, value));
        }

        hooks.extend_config(&self.id, options.targets, move |target, tree| {
            for (raw, segments, value) in &patches {
                if !path::assign(tree, segments, Value::from_json(value)) {
                    bail!("cannot set `{}` in the {} config", raw, target);
                }
            }
            Ok(())
        });

        Ok(())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

impl ExtensionRunner {
    /// Build a runner from the project's extension manifest.
    ///
    /// A project without a manifest has no extensions.
    pub fn discover(project_root: &Path) -> Result<Self> {
        let manifest_path = project_root.join(EXTENSIONS_FILENAME);
        let mut runner = ExtensionRunner::new();

        if !manifest_path.exists() {
            return Ok(runner);
        }

        let contents = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("failed to read {}", manifest_path.display()))?;
        let entries: IndexMap<String, serde_json::Value> = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse {}", manifest_path.display()))?;

        for (id, options) in entries {
            runner.register(Box::new(ManifestExtension::new(id, options)));
        }

        tracing::debug!("discovered extensions: {:?}", runner);
        Ok(runner)
    }
}
