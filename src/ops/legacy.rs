//! Directive builder for hosts that predate built-in directive handling.
//!
//! Older hosts expect the build to discover server directives itself: every
//! `*.js` or `*.ts` module under `src-ssr/directives` names one directive.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::ops::errors::InspectError;

/// Directory scanned for directive modules, relative to the project root.
pub const DIRECTIVES_DIR: &str = "src-ssr/directives";

const DIRECTIVE_EXTENSIONS: &[&str] = &["js", "ts"];

/// Output of the legacy directives builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveManifest {
    /// Directive names, sorted and unique
    pub names: Vec<String>,
}

impl DirectiveManifest {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Builds the directive manifest for a project.
#[derive(Debug, Clone)]
pub struct LegacyDirectives {
    root: PathBuf,
}

impl LegacyDirectives {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LegacyDirectives { root: root.into() }
    }

    pub fn directives_dir(&self) -> PathBuf {
        self.root.join(DIRECTIVES_DIR)
    }

    /// Scan the directives directory. A missing directory yields no directives.
    pub fn build(&self) -> Result<DirectiveManifest, InspectError> {
        let dir = self.directives_dir();
        if !dir.is_dir() {
            tracing::debug!("no legacy directives at {}", dir.display());
            return Ok(DirectiveManifest::default());
        }

        let mut names = Vec::new();
        for entry in WalkDir::new(&dir).follow_links(true) {
            let entry = entry.map_err(|source| InspectError::LegacyDirectives { source })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = directive_name(entry.path()) {
                names.push(name);
            }
        }

        names.sort();
        names.dedup();

        tracing::debug!("legacy directives: {:?}", names);
        Ok(DirectiveManifest { names })
    }
}

fn directive_name(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !DIRECTIVE_EXTENSIONS.contains(&ext) {
        return None;
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let manifest = LegacyDirectives::new(tmp.path()).build().unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_collects_sorted_unique_stems() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(DIRECTIVES_DIR);
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("tooltip.ts"), "").unwrap();
        std::fs::write(dir.join("focus.js"), "").unwrap();
        std::fs::write(dir.join("focus.ts"), "").unwrap();
        std::fs::write(dir.join("README.md"), "").unwrap();
        std::fs::write(dir.join("nested").join("ripple.js"), "").unwrap();

        let manifest = LegacyDirectives::new(tmp.path()).build().unwrap();
        assert_eq!(manifest.names, vec!["focus", "ripple", "tooltip"]);
    }
}
