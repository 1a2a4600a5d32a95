//! The conversion engine.
//!
//! [`Engine`] ties the pieces together: it validates settings once, makes
//! sure the office suite is available (installing it when allowed), and
//! exposes single and batch conversion in both the blocking worker-pool
//! model and the async bounded-concurrency model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use df_core::{ConversionOutcome, EngineConfig, EngineSettings, Result, TargetFormats};
use df_formats::{FormatInfo, FormatRegistry};
use df_office::{AptProvisioner, Converter, Provisioner, ToolLocator};

use crate::concurrent::{AsyncScheduler, CompletionStream};
use crate::limiter::ConcurrencyLimiter;
use crate::parallel::{CompletionIter, ParallelScheduler};
use crate::runner::JobRunner;

/// Document conversion engine.
///
/// Cheap to share behind an `Arc`; every operation takes `&self`.
pub struct Engine {
    config: EngineConfig,
    tool: Option<PathBuf>,
    runner: Arc<dyn JobRunner>,
    limiter: Arc<ConcurrencyLimiter>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("tool", &self.tool)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Build an engine, installing the office suite through `apt-get` if it
    /// is missing and `auto_install` is set.
    ///
    /// # Errors
    ///
    /// Returns [`df_core::Error::Validation`] for invalid settings. A missing
    /// or uninstallable office suite is not an error: every conversion then
    /// fails with "LibreOffice not found in PATH".
    pub fn new(settings: EngineSettings) -> Result<Self> {
        Self::with_provisioner(settings, &AptProvisioner::default())
    }

    /// Like [`new`](Self::new) with a caller-supplied provisioner.
    pub fn with_provisioner(settings: EngineSettings, provisioner: &dyn Provisioner) -> Result<Self> {
        let config = EngineConfig::new(settings)?;
        let locator = ToolLocator::new(config.soffice_path());

        let mut tool = locator.discover();
        if tool.is_none() && config.auto_install() {
            tracing::warn!("LibreOffice not found, attempting installation");
            if provisioner.install() {
                tool = locator.discover();
            } else {
                tracing::warn!("LibreOffice installation failed");
            }
        }

        match &tool {
            Some(path) => tracing::info!("using office suite at {}", path.display()),
            None => tracing::warn!("LibreOffice not available; conversions will fail"),
        }

        Ok(Self::from_config(config, tool))
    }

    /// Build an engine from an already validated config and a resolved tool
    /// path, skipping discovery and provisioning.
    pub fn from_config(config: EngineConfig, tool: Option<PathBuf>) -> Self {
        let converter = Converter::from_config(&config, tool.clone());
        Self::with_runner(config, tool, Arc::new(converter))
    }

    /// Build an engine that delegates each conversion to `runner`.
    pub fn with_runner(
        config: EngineConfig,
        tool: Option<PathBuf>,
        runner: Arc<dyn JobRunner>,
    ) -> Self {
        let limiter = Arc::new(ConcurrencyLimiter::new(config.max_concurrency()));
        Self {
            config,
            tool,
            runner,
            limiter,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The resolved office-suite executable, if any.
    pub fn tool_path(&self) -> Option<&Path> {
        self.tool.as_deref()
    }

    /// The limiter shared by all async conversions of this engine.
    pub fn limiter(&self) -> &Arc<ConcurrencyLimiter> {
        &self.limiter
    }

    // -----------------------------------------------------------------------
    // Blocking conversion
    // -----------------------------------------------------------------------

    /// Convert one file, blocking until it finishes.
    ///
    /// Callable from within an async runtime, though it blocks the calling
    /// worker thread; prefer [`async_transform`](Self::async_transform) there.
    pub fn transform(&self, path: impl AsRef<Path>, target: &str) -> ConversionOutcome {
        self.runner.run_blocking(path.as_ref(), target)
    }

    /// Convert a batch on a pool of `parallel_workers` threads.
    ///
    /// # Errors
    ///
    /// Returns [`df_core::Error::Scheduling`] before any work starts when a
    /// per-file target list does not match the number of paths.
    pub fn transform_many<P: AsRef<Path>>(
        &self,
        paths: &[P],
        targets: impl Into<TargetFormats>,
    ) -> Result<CompletionIter> {
        ParallelScheduler::new(Arc::clone(&self.runner), self.config.parallel_workers())
            .run(paths, &targets.into())
    }

    // -----------------------------------------------------------------------
    // Async conversion
    // -----------------------------------------------------------------------

    /// Convert one file cooperatively, holding one limiter permit for the
    /// duration of the tool invocation.
    ///
    /// A missing source or tool fails without waiting for a permit.
    pub async fn async_transform(&self, path: impl AsRef<Path>, target: &str) -> ConversionOutcome {
        self.runner
            .run_limited(path.as_ref(), target, &self.limiter)
            .await
    }

    /// Convert a batch as concurrent tasks, at most `max_concurrency`
    /// running at once, streaming outcomes in completion order.
    ///
    /// # Errors
    ///
    /// Returns [`df_core::Error::Scheduling`] before any task is spawned
    /// when a per-file target list does not match the number of paths.
    pub async fn async_transform_many<P: AsRef<Path>>(
        &self,
        paths: &[P],
        targets: impl Into<TargetFormats>,
    ) -> Result<CompletionStream> {
        AsyncScheduler::new(Arc::clone(&self.runner), Arc::clone(&self.limiter))
            .run(paths, &targets.into())
    }

    // -----------------------------------------------------------------------
    // Format queries
    // -----------------------------------------------------------------------

    /// Extensions the office suite can read.
    pub fn supported_input_formats() -> std::collections::BTreeSet<&'static str> {
        FormatRegistry::supported_input_formats()
    }

    /// Extensions the office suite can write.
    pub fn supported_output_formats() -> std::collections::BTreeSet<&'static str> {
        FormatRegistry::supported_output_formats()
    }

    /// Whether `from_ext` can be converted to `to_ext`.
    pub fn can_convert(from_ext: &str, to_ext: &str) -> bool {
        FormatRegistry::can_convert(from_ext, to_ext)
    }

    /// Formats of the named category; empty for an unknown name.
    pub fn formats_by_category(category: &str) -> Vec<FormatInfo> {
        FormatRegistry::formats_by_category_name(category)
    }
}
