//! Configuration resolution.
//!
//! The resolver moves through fixed stages:
//!
//! ```text
//! Uninitialized -> Resolved -> Compiled -> BundlerConfigAttached
//! ```
//!
//! `prepare` evaluates the descriptor, `compile` merges its layers into a
//! [`CompiledConfig`], and `attach_bundler_config` generates one bundler tree
//! per target and runs the extension hooks on them.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::builder::bundler;
use crate::core::compiled::{BuildSettings, CompiledConfig};
use crate::core::context::ExecutionContext;
use crate::core::descriptor::{ConfigDescriptor, DESCRIPTOR_FILENAME};
use crate::extension::BuildHooks;
use crate::ops::errors::InspectError;
use crate::ops::legacy::DirectiveManifest;

/// Lifecycle stage of a [`ConfigResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ResolverStage {
    Uninitialized,
    Resolved,
    Compiled,
    BundlerConfigAttached,
}

impl fmt::Display for ResolverStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolverStage::Uninitialized => "uninitialized",
            ResolverStage::Resolved => "resolved",
            ResolverStage::Compiled => "compiled",
            ResolverStage::BundlerConfigAttached => "bundler-attached",
        };
        f.write_str(s)
    }
}

/// Resolves a project's descriptor into a compiled configuration.
#[derive(Debug)]
pub struct ConfigResolver {
    root: PathBuf,
    ctx: ExecutionContext,
    stage: ResolverStage,
    descriptor: Option<ConfigDescriptor>,
    legacy: Option<DirectiveManifest>,
    compiled: Option<CompiledConfig>,
}

impl ConfigResolver {
    pub fn new(root: impl Into<PathBuf>, ctx: ExecutionContext) -> Self {
        ConfigResolver {
            root: root.into(),
            ctx,
            stage: ResolverStage::Uninitialized,
            descriptor: None,
            legacy: None,
            compiled: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn stage(&self) -> ResolverStage {
        self.stage
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.root.join(DESCRIPTOR_FILENAME)
    }

    /// Read and evaluate the descriptor.
    pub fn prepare(&mut self) -> Result<(), InspectError> {
        self.expect_stage(ResolverStage::Uninitialized)?;

        let path = self.descriptor_path();
        tracing::debug!("evaluating {}", path.display());
        let descriptor = ConfigDescriptor::load(&path)?;

        self.descriptor = Some(descriptor);
        self.stage = ResolverStage::Resolved;
        Ok(())
    }

    /// Merge the output of the legacy directives builder. Must precede `compile`.
    pub fn merge_legacy_directives(
        &mut self,
        manifest: DirectiveManifest,
    ) -> Result<(), InspectError> {
        self.expect_stage(ResolverStage::Resolved)?;
        self.legacy = Some(manifest);
        Ok(())
    }

    /// Merge the descriptor layers into a compiled configuration.
    pub fn compile(&mut self) -> Result<(), InspectError> {
        self.expect_stage(ResolverStage::Resolved)?;
        let descriptor = self.descriptor.as_ref().ok_or(InspectError::NotReady {
            expected: ResolverStage::Resolved,
            found: self.stage,
        })?;

        let mut compiled = CompiledConfig::new(self.ctx.clone());
        let dev = self.ctx.dev();

        for target in bundler::build_targets(self.ctx.mode(), &descriptor.ssr) {
            let mut layer = descriptor.build.clone();
            if let Some(branch) = descriptor.build.branch(dev) {
                layer.merge(branch);
            }
            if let Some(target_layer) = descriptor.target_layer(target) {
                layer.merge(target_layer);
                if let Some(branch) = target_layer.branch(dev) {
                    layer.merge(branch);
                }
            }

            let mut settings = BuildSettings::defaults(&self.ctx);
            settings.apply(&layer);
            compiled.targets.insert(target, settings);
        }

        compiled.aliases = descriptor.aliases.clone();
        compiled.rules = descriptor.rules.clone();
        compiled.ssr = descriptor.ssr.clone();
        compiled.ssg = descriptor.ssg.clone();
        compiled.directives = merge_directives(&descriptor.ssr.directives, self.legacy.as_ref());

        tracing::debug!(
            "compiled {} target(s) for mode {}",
            compiled.targets.len(),
            self.ctx.mode()
        );

        self.compiled = Some(compiled);
        self.stage = ResolverStage::Compiled;
        Ok(())
    }

    /// Generate bundler trees, run the extension hooks on them, and attach
    /// them to the compiled config. Calling again replaces the trees.
    pub fn attach_bundler_config(&mut self, hooks: &BuildHooks) -> Result<(), InspectError> {
        if self.stage < ResolverStage::Compiled {
            return Err(InspectError::NotReady {
                expected: ResolverStage::Compiled,
                found: self.stage,
            });
        }
        let compiled = self.compiled.as_mut().ok_or(InspectError::NotReady {
            expected: ResolverStage::Compiled,
            found: self.stage,
        })?;

        let trees = bundler::generate(compiled, &self.root);
        for (target, tree) in &trees {
            hooks.apply(*target, tree)?;
        }
        compiled.attach_bundler(trees);

        self.stage = ResolverStage::BundlerConfigAttached;
        Ok(())
    }

    /// The compiled configuration, once `compile` has run.
    pub fn compiled(&self) -> Result<&CompiledConfig, InspectError> {
        self.compiled.as_ref().ok_or(InspectError::NotReady {
            expected: ResolverStage::Compiled,
            found: self.stage,
        })
    }

    pub fn into_compiled(self) -> Result<CompiledConfig, InspectError> {
        let found = self.stage;
        self.compiled.ok_or(InspectError::NotReady {
            expected: ResolverStage::Compiled,
            found,
        })
    }

    fn expect_stage(&self, expected: ResolverStage) -> Result<(), InspectError> {
        if self.stage != expected {
            return Err(InspectError::NotReady {
                expected,
                found: self.stage,
            });
        }
        Ok(())
    }
}

/// Declared directives first, then legacy-built ones not already declared.
fn merge_directives(declared: &[String], legacy: Option<&DirectiveManifest>) -> Vec<String> {
    let mut directives = declared.to_vec();
    for name in legacy.into_iter().flat_map(|m| m.names.iter()) {
        if !directives.contains(name) {
            directives.push(name.clone());
        }
    }
    directives
}
