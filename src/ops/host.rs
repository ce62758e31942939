//! Host environment lookups and the capabilities derived from them.

use std::path::{Path, PathBuf};

use semver::{Version, VersionReq};
use serde::Deserialize;

/// The host application package the project builds with.
pub const APP_PACKAGE: &str = "@marina/app";

/// Host versions that still need the legacy directives builder.
pub const LEGACY_DIRECTIVES_REQ: &str = "<3.4.0";

#[derive(Debug, Deserialize)]
struct PackageJson {
    version: Version,
}

/// Read-only view of the packages installed in a project.
#[derive(Debug, Clone)]
pub struct HostEnvironment {
    root: PathBuf,
}

impl HostEnvironment {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        HostEnvironment { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installed version of `name`, if the package is present and readable.
    pub fn package_version(&self, name: &str) -> Option<Version> {
        let manifest = self
            .root
            .join("node_modules")
            .join(name)
            .join("package.json");

        let contents = std::fs::read_to_string(&manifest).ok()?;
        match serde_json::from_str::<PackageJson>(&contents) {
            Ok(pkg) => Some(pkg.version),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {}", manifest.display(), e);
                None
            }
        }
    }

    /// Whether `name` is installed with a version matching `req`.
    pub fn has_package(&self, name: &str, req: &VersionReq) -> bool {
        self.package_version(name)
            .is_some_and(|version| req.matches(&version))
    }
}

/// Host capabilities, resolved once per invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostCapabilities {
    /// The host predates built-in directive handling
    pub legacy_directives: bool,
}

impl HostCapabilities {
    pub fn detect(host: &HostEnvironment) -> Self {
        let req = VersionReq::parse(LEGACY_DIRECTIVES_REQ)
            .unwrap_or_else(|_| VersionReq::STAR);
        let legacy_directives = host.has_package(APP_PACKAGE, &req);

        tracing::debug!(
            "host {} version {:?}, legacy directives: {}",
            APP_PACKAGE,
            host.package_version(APP_PACKAGE).map(|v| v.to_string()),
            legacy_directives
        );

        HostCapabilities { legacy_directives }
    }
}
