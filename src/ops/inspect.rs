//! The inspect operation.
//!
//! Resolves the project's configuration for a mode and prints the bundler
//! configuration of every target:
//!
//! ```text
//!
//!  Showing bundler config for "client" with depth of 5
//!
//! { ... }
//!
//!   Depth used: 5. You can change it with "-d" parameter.
//! ```

use std::io::Write;
use std::path::PathBuf;

use crate::builder::split::{split, NamedConfigEntry};
use crate::core::context::{BuildKind, ExecutionContext};
use crate::core::mode::{Mode, ModeProbe, Target};
use crate::core::value::Value;
use crate::extension::ExtensionRunner;
use crate::inspect::path::select;
use crate::inspect::printer::{render, Depth, RenderOptions};
use crate::ops::errors::InspectError;
use crate::ops::host::HostCapabilities;
use crate::ops::legacy::LegacyDirectives;
use crate::ops::resolve::ConfigResolver;

/// Identifier under which the inspect command is itself registered as an
/// extension. It is removed before the other extensions run.
pub const INSPECT_EXTENSION_ID: &str = "ssg";

/// Options for an inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectOptions {
    pub mode: Mode,
    pub depth: Depth,
    /// Dot path narrowing each printed config
    pub path: Option<String>,
    pub colors: bool,
    pub compact: bool,
    pub show_hidden: bool,
    pub debug: bool,
}

impl Default for InspectOptions {
    fn default() -> Self {
        InspectOptions {
            mode: Mode::Ssg,
            depth: Depth::default(),
            path: None,
            colors: true,
            compact: false,
            show_hidden: true,
            debug: false,
        }
    }
}

impl InspectOptions {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            depth: self.depth,
            colors: self.colors,
            show_hidden: self.show_hidden,
            compact: self.compact,
        }
    }
}

/// What an inspection printed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectReport {
    /// Targets printed, in order
    pub targets: Vec<Target>,
    /// Targets where the requested path was not found
    pub missing: Vec<Target>,
}

/// Inspect the bundler configurations of a project.
pub struct InspectCommand {
    root: PathBuf,
    options: InspectOptions,
    probe: Box<dyn ModeProbe>,
    runner: ExtensionRunner,
    capabilities: HostCapabilities,
}

impl InspectCommand {
    pub fn new(
        root: impl Into<PathBuf>,
        options: InspectOptions,
        probe: Box<dyn ModeProbe>,
        runner: ExtensionRunner,
        capabilities: HostCapabilities,
    ) -> Self {
        InspectCommand {
            root: root.into(),
            options,
            probe,
            runner,
            capabilities,
        }
    }

    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Resolve the configuration and print it to `out`.
    pub fn run<W: Write>(mut self, out: &mut W) -> Result<InspectReport, InspectError> {
        let mode = self.options.mode;
        let required = mode.required_mode();
        if !self.probe.is_installed(required) {
            return Err(InspectError::ModeUnavailable { mode: required });
        }

        let ctx = ExecutionContext::new(mode, BuildKind::Prod).with_debug(self.options.debug);
        tracing::debug!("inspecting {} (production)", mode);

        if !self.runner.remove(INSPECT_EXTENSION_ID) {
            tracing::debug!("extension `{}` not registered", INSPECT_EXTENSION_ID);
        }
        let hooks = self.runner.register_extensions(&ctx)?;

        let mut resolver = ConfigResolver::new(&self.root, ctx);
        resolver.prepare()?;

        if self.capabilities.legacy_directives {
            let manifest = LegacyDirectives::new(&self.root).build()?;
            resolver.merge_legacy_directives(manifest)?;
        }

        resolver.compile()?;
        resolver.attach_bundler_config(&hooks)?;

        let compiled = resolver.into_compiled()?;
        let entries = split(&compiled, mode)?;

        print_entries(&entries, &self.options, out)
    }
}

/// Print one block per entry, then the depth footer.
///
/// A path missing from an entry prints `undefined` for that entry.
pub fn print_entries<W: Write>(
    entries: &[NamedConfigEntry],
    options: &InspectOptions,
    out: &mut W,
) -> Result<InspectReport, InspectError> {
    let render_options = options.render_options();
    let mut report = InspectReport::default();

    for entry in entries {
        let value = match options.path.as_deref() {
            Some(path) => select(&entry.config, path).unwrap_or_else(|| {
                tracing::warn!("path `{}` not found in the {} config", path, entry.name);
                report.missing.push(entry.name);
                Value::Undefined
            }),
            None => entry.config.clone(),
        };

        writeln!(out)?;
        writeln!(
            out,
            " Showing bundler config for \"{}\" with depth of {}",
            entry.name, options.depth
        )?;
        writeln!(out)?;
        writeln!(out, "{}", render(&value, &render_options))?;

        report.targets.push(entry.name);
    }

    writeln!(
        out,
        "\n  Depth used: {}. You can change it with \"-d\" parameter.\n",
        options.depth
    )?;

    Ok(report)
}
