//! Global context for Marina operations.
//!
//! Provides centralized access to the working directory, the global Marina
//! home (`~/.marina/`) and project discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::descriptor::DESCRIPTOR_FILENAME;

/// Environment variable overriding the Marina home directory.
pub const MARINA_HOME_ENV: &str = "MARINA_HOME";

/// Global context containing paths and environment.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global Marina data (~/.marina/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        let home = match std::env::var_os(MARINA_HOME_ENV) {
            Some(home) => PathBuf::from(home),
            None => directories::BaseDirs::new()
                .map(|b| b.home_dir().join(".marina"))
                .unwrap_or_else(|| PathBuf::from(".marina")),
        };

        Ok(GlobalContext { cwd, home })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Create a GlobalContext with a specific home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the Marina home directory (~/.marina/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path (.marina/config.toml).
    pub fn project_config_path(project_root: &Path) -> PathBuf {
        project_root.join(".marina").join("config.toml")
    }

    /// Find the project root (directory containing marina.config.toml),
    /// starting from cwd and searching upward.
    pub fn find_project_root(&self) -> Option<PathBuf> {
        let mut current = self.cwd.clone();
        loop {
            if current.join(DESCRIPTOR_FILENAME).is_file() {
                return Some(current);
            }
            if !current.pop() {
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf())
            .unwrap()
            .with_home(tmp.path().join("home"));

        assert_eq!(ctx.cwd(), tmp.path());
        assert_eq!(ctx.config_path(), tmp.path().join("home").join("config.toml"));
        assert_eq!(
            GlobalContext::project_config_path(tmp.path()),
            tmp.path().join(".marina").join("config.toml")
        );
    }

    #[test]
    fn test_find_project_root_searches_upward() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(DESCRIPTOR_FILENAME), "").unwrap();
        let nested = tmp.path().join("src").join("pages");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested).unwrap();
        assert_eq!(ctx.find_project_root(), Some(tmp.path().to_path_buf()));
    }

    #[test]
    fn test_find_project_root_missing() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path().to_path_buf()).unwrap();
        assert_eq!(ctx.find_project_root(), None);
    }
}
