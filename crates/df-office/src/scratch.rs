//! Per-invocation scratch environments.
//!
//! The office suite keeps its user profile (registry, lock files, recovery
//! data) in a directory it creates on first start. Two processes pointed at
//! the same profile contend for its lock and can corrupt it, so every
//! invocation gets a private one.
//!
//! A [`ScratchEnvironment`] is only a reserved path: [`ScratchRoot::acquire`]
//! does not create anything, the tool creates the directory lazily. Removal
//! is best-effort and happens on [`ScratchEnvironment::release`] or on drop,
//! whichever comes first.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Prefix of every scratch directory name.
const SCRATCH_PREFIX: &str = "docforge_profile_";

/// The directory under which scratch environments are allocated.
#[derive(Debug, Clone)]
pub struct ScratchRoot {
    root: PathBuf,
}

impl ScratchRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Reserve a fresh, uniquely named environment under this root.
    ///
    /// Names carry a random 128-bit UUID, so concurrent callers never
    /// collide and no locking is needed.
    pub fn acquire(&self) -> ScratchEnvironment {
        let path = self
            .root
            .join(format!("{SCRATCH_PREFIX}{}", Uuid::new_v4()));
        tracing::debug!("scratch acquired: {}", path.display());
        ScratchEnvironment {
            path,
            released: false,
        }
    }
}

impl Default for ScratchRoot {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

/// An exclusively owned profile directory for one tool invocation.
#[derive(Debug)]
pub struct ScratchEnvironment {
    path: PathBuf,
    released: bool,
}

impl ScratchEnvironment {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The `file://` URL form the office suite expects for its
    /// `UserInstallation` setting.
    pub fn file_url(&self) -> String {
        format!("file://{}", self.path.display())
    }

    /// Recursively delete the directory. Idempotent; every error (including
    /// "never created") is swallowed so cleanup can never mask the result of
    /// the invocation it served.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => tracing::debug!("scratch removed: {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::debug!(
                "ignoring scratch cleanup error for {}: {e}",
                self.path.display()
            ),
        }
    }
}

impl Drop for ScratchEnvironment {
    fn drop(&mut self) {
        self.release();
    }
}
