//! Build modes and the targets each one produces.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named build variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Single page application
    Spa,
    /// Progressive web app
    Pwa,
    /// Server-side rendering
    Ssr,
    /// Static site generation (builds on top of ssr)
    Ssg,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Spa => "spa",
            Mode::Pwa => "pwa",
            Mode::Ssr => "ssr",
            Mode::Ssg => "ssg",
        }
    }

    /// The mode that must be installed in the project for this one to work.
    pub fn required_mode(&self) -> Mode {
        match self {
            Mode::Ssg => Mode::Ssr,
            other => *other,
        }
    }

    /// Every target this mode can produce, in output order.
    pub fn targets(&self) -> &'static [Target] {
        match self {
            Mode::Spa | Mode::Pwa => &[Target::Client],
            Mode::Ssr => &[Target::Client, Target::Server, Target::Webserver],
            Mode::Ssg => &[Target::Client, Target::Server],
        }
    }

    /// Whether the mode renders on the server.
    pub fn is_server_rendered(&self) -> bool {
        matches!(self, Mode::Ssr | Mode::Ssg)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spa" => Ok(Mode::Spa),
            "pwa" => Ok(Mode::Pwa),
            "ssr" => Ok(Mode::Ssr),
            "ssg" => Ok(Mode::Ssg),
            _ => Err(format!(
                "invalid mode '{}'; expected 'spa', 'pwa', 'ssr', or 'ssg'",
                s
            )),
        }
    }
}

/// One concrete build output within a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Browser bundle
    Client,
    /// Server rendering bundle
    Server,
    /// Auxiliary server runtime bundle
    Webserver,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Client => "client",
            Target::Server => "server",
            Target::Webserver => "webserver",
        }
    }

    /// Whether the bundle runs under node rather than in a browser.
    pub fn is_node(&self) -> bool {
        !matches!(self, Target::Client)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Target::Client),
            "server" => Ok(Target::Server),
            "webserver" => Ok(Target::Webserver),
            _ => Err(format!(
                "unknown target '{}'; expected 'client', 'server', or 'webserver'",
                s
            )),
        }
    }
}

/// Answers whether a mode has been added to the project.
pub trait ModeProbe {
    fn is_installed(&self, mode: Mode) -> bool;
}

/// Mode probe that looks for each mode's source directory.
#[derive(Debug, Clone)]
pub struct FsModeProbe {
    root: PathBuf,
}

impl FsModeProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsModeProbe { root: root.into() }
    }

    /// Source directory a mode needs, if any.
    pub fn mode_dir(&self, mode: Mode) -> Option<PathBuf> {
        match mode {
            Mode::Spa => None,
            Mode::Pwa => Some(self.root.join("src-pwa")),
            Mode::Ssr | Mode::Ssg => Some(self.root.join("src-ssr")),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ModeProbe for FsModeProbe {
    fn is_installed(&self, mode: Mode) -> bool {
        match self.mode_dir(mode) {
            Some(dir) => dir.is_dir(),
            None => true,
        }
    }
}
