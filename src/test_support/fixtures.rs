//! Project fixtures written to temporary directories.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::descriptor::DESCRIPTOR_FILENAME;
use crate::core::mode::{FsModeProbe, Mode};
use crate::extension::EXTENSIONS_FILENAME;
use crate::ops::host::APP_PACKAGE;
use crate::ops::legacy::DIRECTIVES_DIR;

/// A throwaway Marina project. The directory is removed on drop.
#[derive(Debug)]
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    /// Create an empty project (no descriptor, no modes).
    pub fn new() -> Self {
        ProjectFixture {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    /// A project with the given descriptor and the ssr mode installed.
    pub fn ssr(descriptor: &str) -> Self {
        ProjectFixture::new().descriptor(descriptor).with_mode(Mode::Ssr)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, rel: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(rel)
    }

    /// Write `marina.config.toml`.
    pub fn descriptor(self, contents: &str) -> Self {
        self.with_file(DESCRIPTOR_FILENAME, contents)
    }

    /// Write `marina.extensions.json`.
    pub fn extensions(self, json: &str) -> Self {
        self.with_file(EXTENSIONS_FILENAME, json)
    }

    /// Add the source directory of a mode.
    pub fn with_mode(self, mode: Mode) -> Self {
        if let Some(dir) = FsModeProbe::new(self.root()).mode_dir(mode) {
            std::fs::create_dir_all(dir).expect("failed to create mode dir");
        }
        self
    }

    /// Install the host package at `version`.
    pub fn with_host_version(self, version: &str) -> Self {
        let manifest = format!(
            r#"{{ "name": "{}", "version": "{}" }}"#,
            APP_PACKAGE, version
        );
        let rel = Path::new("node_modules").join(APP_PACKAGE).join("package.json");
        self.with_file(rel, &manifest)
    }

    /// Add a legacy directive module.
    pub fn with_directive(self, file_name: &str) -> Self {
        let rel = Path::new(DIRECTIVES_DIR).join(file_name);
        self.with_file(rel, "export default {}\n")
    }

    /// Write a file relative to the project root, creating parent directories.
    pub fn with_file(self, rel: impl AsRef<Path>, contents: &str) -> Self {
        let full = self.path(rel);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("failed to create parent dir");
        }
        std::fs::write(&full, contents).expect("failed to write fixture file");
        self
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Common descriptor templates.
pub mod descriptors {
    /// A descriptor with no settings.
    pub fn empty() -> String {
        String::new()
    }

    /// A descriptor adding one module rule for the given targets.
    pub fn with_rule(test: &str, loader: &str, targets: &[&str]) -> String {
        let targets = targets
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"[[rules]]
test = '{test}'
loader = "{loader}"
targets = [{targets}]
"#
        )
    }

    /// A descriptor declaring server directives.
    pub fn with_directives(names: &[&str]) -> String {
        let names = names
            .iter()
            .map(|n| format!("\"{}\"", n))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"[ssr]
directives = [{names}]
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::descriptor::ConfigDescriptor;
    use crate::core::mode::ModeProbe;

    #[test]
    fn test_templates_parse() {
        for contents in [
            descriptors::empty(),
            descriptors::with_rule(r"\.md$", "markdown-loader", &["client"]),
            descriptors::with_directives(&["tooltip", "focus"]),
        ] {
            ConfigDescriptor::parse(Path::new(DESCRIPTOR_FILENAME), &contents).unwrap();
        }
    }

    #[test]
    fn test_fixture_layout() {
        let fixture = ProjectFixture::ssr("")
            .with_host_version("3.3.0")
            .with_directive("tooltip.js");

        assert!(fixture.path(DESCRIPTOR_FILENAME).is_file());
        assert!(FsModeProbe::new(fixture.root()).is_installed(Mode::Ssg));
        assert!(fixture.path("src-ssr/directives/tooltip.js").is_file());
    }
}
