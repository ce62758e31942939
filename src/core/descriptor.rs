//! The project-authored configuration descriptor (`marina.config.toml`).
//!
//! The descriptor is layered:
//! - `[build]` - base settings for every target
//! - `[build.dev]` / `[build.prod]` - branches applied for dev or prod builds
//! - `[target.<name>]` - per-target settings, applied last (may carry branches too)
//!
//! ```toml
//! [build]
//! public_path = "/"
//! source_map = false
//!
//! [build.dev]
//! source_map = true
//!
//! [target.server]
//! minify = false
//!
//! [[rules]]
//! test = '\.md$'
//! loader = "markdown-loader"
//! targets = ["client"]
//! ```

use std::path::Path;

use indexmap::IndexMap;
use miette::{Diagnostic as MietteDiagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

use crate::core::mode::Target;

/// File name of the descriptor in the project root.
pub const DESCRIPTOR_FILENAME: &str = "marina.config.toml";

/// Error raised while evaluating the descriptor.
#[derive(Debug, Error, MietteDiagnostic)]
#[error("{file} has errors: {reason}")]
#[diagnostic(
    code(marina::descriptor::evaluation),
    help("Fix the configuration file and run the command again")
)]
pub struct DescriptorError {
    /// File name of the descriptor
    pub file: String,
    /// Underlying cause
    pub reason: String,
    #[source_code]
    pub src: Option<NamedSource<String>>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl DescriptorError {
    fn new(path: &Path, reason: impl Into<String>) -> Self {
        DescriptorError {
            file: file_name(path),
            reason: reason.into(),
            src: None,
            span: None,
        }
    }

    fn syntax(path: &Path, contents: &str, err: toml::de::Error) -> Self {
        let file = file_name(path);
        DescriptorError {
            reason: err.message().to_string(),
            span: err.span().map(SourceSpan::from),
            src: Some(NamedSource::new(file.clone(), contents.to_string())),
            file,
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// The parsed descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigDescriptor {
    /// Base build layer and its dev/prod branches
    pub build: BuildLayer,

    /// Per-target layers, keyed by target name
    pub target: IndexMap<String, BuildLayer>,

    /// Server rendering settings
    pub ssr: SsrSection,

    /// Static generation settings
    pub ssg: SsgSection,

    /// Module resolution aliases
    pub aliases: IndexMap<String, String>,

    /// Extra module rules
    pub rules: Vec<RuleSpec>,
}

/// One layer of build settings. Unset fields inherit from lower layers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildLayer {
    pub public_path: Option<String>,
    pub dist_dir: Option<String>,
    pub source_map: Option<bool>,
    pub minify: Option<bool>,
    pub extract_css: Option<bool>,
    pub router_mode: Option<String>,

    /// Definitions exposed to bundled code, merged key by key
    pub env: IndexMap<String, String>,

    pub transpile_dependencies: Option<Vec<String>>,

    /// Branch applied for dev builds
    pub dev: Option<Box<BuildLayer>>,

    /// Branch applied for prod builds
    pub prod: Option<Box<BuildLayer>>,
}

impl BuildLayer {
    /// Merge another layer into this one (other takes precedence).
    ///
    /// Branches are not merged; they are expanded by the resolver.
    pub fn merge(&mut self, other: &BuildLayer) {
        if other.public_path.is_some() {
            self.public_path = other.public_path.clone();
        }
        if other.dist_dir.is_some() {
            self.dist_dir = other.dist_dir.clone();
        }
        if other.source_map.is_some() {
            self.source_map = other.source_map;
        }
        if other.minify.is_some() {
            self.minify = other.minify;
        }
        if other.extract_css.is_some() {
            self.extract_css = other.extract_css;
        }
        if other.router_mode.is_some() {
            self.router_mode = other.router_mode.clone();
        }
        for (key, value) in &other.env {
            self.env.insert(key.clone(), value.clone());
        }
        if other.transpile_dependencies.is_some() {
            self.transpile_dependencies = other.transpile_dependencies.clone();
        }
    }

    /// The branch for a dev or prod build.
    pub fn branch(&self, dev: bool) -> Option<&BuildLayer> {
        if dev {
            self.dev.as_deref()
        } else {
            self.prod.as_deref()
        }
    }

    fn has_branches(&self) -> bool {
        self.dev.is_some() || self.prod.is_some()
    }
}

/// `[ssr]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SsrSection {
    /// Emit the auxiliary webserver bundle in ssr mode
    pub webserver: bool,

    /// Directives that need server-side transforms
    pub directives: Vec<String>,

    /// Serve a PWA alongside the rendered pages
    pub pwa: bool,
}

/// `[ssg]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SsgSection {
    pub routes: Vec<String>,
    pub concurrency: usize,
    pub fallback: String,
    pub crawler: bool,
}

impl Default for SsgSection {
    fn default() -> Self {
        SsgSection {
            routes: vec!["/".to_string()],
            concurrency: 10,
            fallback: "404.html".to_string(),
            crawler: true,
        }
    }
}

/// A `[[rules]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSpec {
    /// Pattern matched against module paths
    pub test: String,
    pub loader: String,
    pub exclude: Option<String>,
    /// Targets the rule applies to (all when unset)
    pub targets: Option<Vec<String>>,
}

impl RuleSpec {
    /// Whether the rule applies to `target`. Target names are validated on load.
    pub fn applies_to(&self, target: Target) -> bool {
        match &self.targets {
            Some(names) => names.iter().any(|n| n == target.as_str()),
            None => true,
        }
    }
}

impl ConfigDescriptor {
    /// Load and evaluate a descriptor file.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DescriptorError::new(path, format!("failed to read file: {}", e)))?;
        Self::parse(path, &contents)
    }

    /// Evaluate descriptor contents. `path` is only used for reporting.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, DescriptorError> {
        let descriptor: ConfigDescriptor =
            toml::from_str(contents).map_err(|e| DescriptorError::syntax(path, contents, e))?;

        descriptor
            .validate()
            .map_err(|reason| DescriptorError::new(path, reason))?;

        Ok(descriptor)
    }

    /// Parsed per-target layers.
    pub fn target_layer(&self, target: Target) -> Option<&BuildLayer> {
        self.target.get(target.as_str())
    }

    fn validate(&self) -> Result<(), String> {
        check_branches("build", &self.build)?;

        for (name, layer) in &self.target {
            name.parse::<Target>()?;
            check_branches(&format!("target.{}", name), layer)?;
        }

        for (i, rule) in self.rules.iter().enumerate() {
            check_pattern(&rule.test)
                .map_err(|e| format!("rules[{}].test is not a valid pattern: {}", i, e))?;
            if let Some(exclude) = &rule.exclude {
                check_pattern(exclude)
                    .map_err(|e| format!("rules[{}].exclude is not a valid pattern: {}", i, e))?;
            }
            for name in rule.targets.iter().flatten() {
                name.parse::<Target>()
                    .map_err(|e| format!("rules[{}]: {}", i, e))?;
            }
        }

        for directive in &self.ssr.directives {
            if directive.is_empty() {
                return Err("ssr.directives contains an empty name".to_string());
            }
        }

        Ok(())
    }
}

/// Rule patterns are bundler regexes, so look-around must be accepted.
fn check_pattern(pattern: &str) -> Result<(), fancy_regex::Error> {
    fancy_regex::Regex::new(pattern).map(|_| ())
}

fn check_branches(section: &str, layer: &BuildLayer) -> Result<(), String> {
    for (branch, nested) in [("dev", &layer.dev), ("prod", &layer.prod)] {
        if nested.as_deref().is_some_and(BuildLayer::has_branches) {
            return Err(format!(
                "[{}.{}] cannot contain further dev/prod branches",
                section, branch
            ));
        }
    }
    Ok(())
}
