//! The normalized configuration produced by compiling a descriptor.

use indexmap::IndexMap;

use crate::core::context::ExecutionContext;
use crate::core::descriptor::{BuildLayer, RuleSpec, SsgSection, SsrSection};
use crate::core::mode::{Mode, Target};
use crate::core::value::Value;

/// Build settings for one target after all layers are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    pub public_path: String,
    pub dist_dir: String,
    pub source_map: bool,
    pub minify: bool,
    pub extract_css: bool,
    pub router_mode: String,
    pub env: IndexMap<String, String>,
    pub transpile_dependencies: Vec<String>,
}

impl BuildSettings {
    /// Defaults for a context, before any descriptor layer.
    pub fn defaults(ctx: &ExecutionContext) -> Self {
        let mode = ctx.mode();
        BuildSettings {
            public_path: "/".to_string(),
            dist_dir: format!("dist/{}", mode),
            source_map: ctx.dev(),
            minify: ctx.prod(),
            extract_css: ctx.prod(),
            router_mode: if mode.is_server_rendered() {
                "history".to_string()
            } else {
                "hash".to_string()
            },
            env: IndexMap::new(),
            transpile_dependencies: Vec::new(),
        }
    }

    /// Apply a layer over these settings. Branches of the layer are ignored.
    pub fn apply(&mut self, layer: &BuildLayer) {
        if let Some(public_path) = &layer.public_path {
            self.public_path = public_path.clone();
        }
        if let Some(dist_dir) = &layer.dist_dir {
            self.dist_dir = dist_dir.clone();
        }
        if let Some(source_map) = layer.source_map {
            self.source_map = source_map;
        }
        if let Some(minify) = layer.minify {
            self.minify = minify;
        }
        if let Some(extract_css) = layer.extract_css {
            self.extract_css = extract_css;
        }
        if let Some(router_mode) = &layer.router_mode {
            self.router_mode = router_mode.clone();
        }
        for (key, value) in &layer.env {
            self.env.insert(key.clone(), value.clone());
        }
        if let Some(deps) = &layer.transpile_dependencies {
            self.transpile_dependencies = deps.clone();
        }
    }
}

/// Bundler trees attached to a compiled config, in target order.
pub type BundlerTrees = IndexMap<Target, Value>;

/// A compiled configuration.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    ctx: ExecutionContext,
    /// Resolved settings per target, in the mode's target order
    pub targets: IndexMap<Target, BuildSettings>,
    pub aliases: IndexMap<String, String>,
    pub rules: Vec<RuleSpec>,
    pub ssr: SsrSection,
    pub ssg: SsgSection,
    /// Directives needing server transforms, including legacy-built ones
    pub directives: Vec<String>,
    bundler: Option<BundlerTrees>,
}

impl CompiledConfig {
    pub fn new(ctx: ExecutionContext) -> Self {
        CompiledConfig {
            ctx,
            targets: IndexMap::new(),
            aliases: IndexMap::new(),
            rules: Vec::new(),
            ssr: SsrSection::default(),
            ssg: SsgSection::default(),
            directives: Vec::new(),
            bundler: None,
        }
    }

    pub fn ctx(&self) -> &ExecutionContext {
        &self.ctx
    }

    pub fn mode(&self) -> Mode {
        self.ctx.mode()
    }

    /// Attach bundler trees, replacing any attached earlier.
    pub fn attach_bundler(&mut self, trees: BundlerTrees) {
        self.bundler = Some(trees);
    }

    /// The attached bundler trees, if the attach step has run.
    pub fn bundler(&self) -> Option<&BundlerTrees> {
        self.bundler.as_ref()
    }

    pub fn has_bundler(&self) -> bool {
        self.bundler.is_some()
    }
}
