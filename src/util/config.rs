//! Configuration file support for Marina.
//!
//! Marina supports two configuration file locations:
//! - Global: `~/.marina/config.toml` - User-wide defaults
//! - Project: `.marina/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.
//!
//! ```toml
//! [inspect]
//! depth = "8"
//! colors = false
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::inspect::Depth;

/// Marina configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Defaults for `marina inspect`
    pub inspect: InspectConfig,
}

/// Defaults for the inspect command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectConfig {
    /// Depth, parsed the same way as `--depth`
    pub depth: Option<DepthSetting>,

    /// Style output with ANSI color codes
    pub colors: Option<bool>,

    /// Render containers on one line
    pub compact: Option<bool>,

    /// Include hidden properties
    pub show_hidden: Option<bool>,
}

/// A configured depth: `depth = 3` or `depth = "all"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DepthSetting {
    Number(i64),
    Text(String),
}

impl DepthSetting {
    pub fn depth(&self) -> Depth {
        match self {
            DepthSetting::Number(n) => Depth::parse_lenient(&n.to_string()),
            DepthSetting::Text(text) => Depth::parse_lenient(text),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.inspect.depth.is_some() {
            self.inspect.depth = other.inspect.depth;
        }
        if other.inspect.colors.is_some() {
            self.inspect.colors = other.inspect.colors;
        }
        if other.inspect.compact.is_some() {
            self.inspect.compact = other.inspect.compact;
        }
        if other.inspect.show_hidden.is_some() {
            self.inspect.show_hidden = other.inspect.show_hidden;
        }
    }
}

/// Load merged configuration from global and project config files.
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.inspect, InspectConfig::default());
        assert!(config.inspect.depth.is_none());
    }

    #[test]
    fn test_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");

        std::fs::write(
            &config_path,
            r#"
[inspect]
depth = "8"
colors = false
"#,
        )
        .unwrap();

        let config = Config::load(&config_path).unwrap();
        assert_eq!(config.inspect.depth, Some(DepthSetting::Text("8".to_string())));
        assert_eq!(config.inspect.colors, Some(false));
        assert_eq!(config.inspect.compact, None);
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config::default();
        base.inspect.depth = Some(DepthSetting::Text("3".to_string()));
        base.inspect.colors = Some(true);

        let mut override_cfg = Config::default();
        override_cfg.inspect.colors = Some(false);

        base.merge(override_cfg);

        assert_eq!(base.inspect.colors, Some(false));
        assert_eq!(base.inspect.depth, Some(DepthSetting::Text("3".to_string()))); // Not overridden
    }

    #[test]
    fn test_load_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        let project = tmp.path().join("project.toml");

        std::fs::write(&global, "[inspect]\ndepth = \"2\"\ncompact = true\n").unwrap();
        std::fs::write(&project, "[inspect]\ndepth = 7\n").unwrap();

        let config = load_config(&global, &project);
        assert_eq!(config.inspect.depth, Some(DepthSetting::Number(7)));
        assert_eq!(config.inspect.compact, Some(true));
    }

    #[test]
    fn test_integer_depth_keeps_other_settings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[inspect]\ndepth = 3\ncolors = false\n").unwrap();

        let config = load_config(&tmp.path().join("missing.toml"), &path);
        assert_eq!(config.inspect.depth, Some(DepthSetting::Number(3)));
        assert_eq!(config.inspect.colors, Some(false));
    }

    #[test]
    fn test_depth_setting_parses_like_the_flag() {
        assert_eq!(DepthSetting::Number(3).depth(), Depth::Limited(3));
        assert_eq!(DepthSetting::Number(0).depth(), Depth::Unbounded);
        assert_eq!(DepthSetting::Number(-2).depth(), Depth::Limited(-2));
        assert_eq!(DepthSetting::Text("all".into()).depth(), Depth::Unbounded);
        assert_eq!(DepthSetting::Text("4".into()).depth(), Depth::Limited(4));
    }

    #[test]
    fn test_unreadable_config_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[inspect\n").unwrap();

        let config = Config::load_or_default(&path);
        assert!(config.inspect.depth.is_none());

        let missing = load_config(&tmp.path().join("a.toml"), &tmp.path().join("b.toml"));
        assert_eq!(missing.inspect, InspectConfig::default());
    }
}
