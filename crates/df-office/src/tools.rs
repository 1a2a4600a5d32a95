//! Office-suite discovery and provisioning.
//!
//! [`ToolLocator`] finds the conversion executable: an explicitly configured
//! path when it exists, otherwise `soffice` or `libreoffice` on `PATH`.
//! [`Provisioner`] abstracts installing or removing the suite; the default
//! [`AptProvisioner`] shells out to `apt-get`.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

/// Executable names searched on `PATH`, in order.
const CANDIDATES: &[&str] = &["soffice", "libreoffice"];

/// Availability information, returned by [`ToolLocator::check`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name.
    pub name: String,
    /// Whether the tool was found.
    pub available: bool,
    /// Version string (first line of `--version` output), if available.
    pub version: Option<String>,
    /// Resolved path to the executable.
    pub path: Option<PathBuf>,
}

/// Finds the office-suite executable.
#[derive(Debug, Clone, Default)]
pub struct ToolLocator {
    explicit: Option<PathBuf>,
}

impl ToolLocator {
    /// A locator that tries `explicit` first.
    ///
    /// An explicit path that does not exist is ignored with a warning and
    /// discovery falls back to `PATH`.
    pub fn new(explicit: Option<&Path>) -> Self {
        Self {
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    /// Resolve the executable, or `None` if the suite is not installed.
    pub fn discover(&self) -> Option<PathBuf> {
        if let Some(ref p) = self.explicit {
            if p.exists() {
                return Some(p.clone());
            }
            tracing::warn!(
                "configured soffice path {} does not exist; searching PATH",
                p.display()
            );
        }

        CANDIDATES.iter().find_map(|name| which::which(name).ok())
    }

    /// Whether an executable can be resolved.
    pub fn is_installed(&self) -> bool {
        self.discover().is_some()
    }

    /// Report availability, path and version of the suite.
    pub fn check(&self) -> ToolInfo {
        match self.discover() {
            Some(path) => ToolInfo {
                name: tool_name(&path),
                available: true,
                version: detect_version(&path),
                path: Some(path),
            },
            None => ToolInfo {
                name: CANDIDATES[0].to_string(),
                available: false,
                version: None,
                path: None,
            },
        }
    }
}

fn tool_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Run `<tool> --version` and return the first line of stdout.
fn detect_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// Provisioning
// ---------------------------------------------------------------------------

/// Installs or removes the office suite.
pub trait Provisioner: Send + Sync {
    /// Install the suite. Returns `true` on success.
    fn install(&self) -> bool;

    /// Remove the suite. Returns `true` on success.
    fn uninstall(&self) -> bool;
}

/// Provisions through `apt-get` (Debian/Ubuntu), elevating with `sudo`.
#[derive(Debug, Clone)]
pub struct AptProvisioner {
    package: String,
}

impl AptProvisioner {
    pub fn new(package: impl Into<String>) -> Self {
        Self {
            package: package.into(),
        }
    }

    fn install_script(&self) -> String {
        format!(
            "sudo apt-get update -y && sudo apt-get install -y {}",
            self.package
        )
    }

    fn uninstall_script(&self) -> String {
        format!("sudo apt-get remove -y {}", self.package)
    }

    fn run(&self, action: &str, script: &str) -> bool {
        tracing::info!("[{action}] running: {script}");
        match Command::new("sh").arg("-c").arg(script).output() {
            Ok(output) if output.status.success() => {
                tracing::info!("[{action}] {} {action} succeeded", self.package);
                true
            }
            Ok(output) => {
                tracing::error!(
                    "[{action}] failed with {}: {}",
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                false
            }
            Err(e) => {
                tracing::error!("[{action}] could not run package manager: {e}");
                false
            }
        }
    }
}

impl Default for AptProvisioner {
    fn default() -> Self {
        Self::new("libreoffice")
    }
}

impl Provisioner for AptProvisioner {
    fn install(&self) -> bool {
        self.run("install", &self.install_script())
    }

    fn uninstall(&self) -> bool {
        self.run("uninstall", &self.uninstall_script())
    }
}
