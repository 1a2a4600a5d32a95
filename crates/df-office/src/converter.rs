//! Single-job conversion.
//!
//! [`Converter`] runs the office suite once against one input file:
//!
//! 1. the source must exist and an executable must be configured, otherwise
//!    the job fails without spawning anything;
//! 2. a private scratch profile is reserved;
//! 3. the tool runs headless with `--convert-to`, writing next to the source,
//!    bounded by the configured timeout;
//! 4. the scratch profile is removed whatever happened;
//! 5. on exit code 0 the written file is located (see [`crate::output`]).
//!
//! Every failure is folded into a [`ConversionOutcome::Failure`]; nothing
//! here returns an engine-level error.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use df_core::{ConversionError, ConversionOutcome, EngineConfig};
use tracing::Instrument;

use crate::command::{CommandError, ToolCommand};
use crate::output::{expected_output, locate_output};
use crate::scratch::{ScratchEnvironment, ScratchRoot};

/// Runs one conversion at a time; cheap to clone and share across workers.
#[derive(Debug, Clone)]
pub struct Converter {
    tool: Option<PathBuf>,
    timeout: Duration,
    scratch: ScratchRoot,
}

impl Converter {
    /// A converter driving `tool`. `None` is valid: every job then fails
    /// with [`ConversionError::ToolUnavailable`].
    pub fn new(tool: Option<PathBuf>, timeout: Duration, scratch: ScratchRoot) -> Self {
        Self {
            tool,
            timeout,
            scratch,
        }
    }

    /// A converter using the timeout and scratch root of `config`.
    pub fn from_config(config: &EngineConfig, tool: Option<PathBuf>) -> Self {
        Self::new(tool, config.timeout(), ScratchRoot::new(config.scratch_root()))
    }

    pub fn tool(&self) -> Option<&Path> {
        self.tool.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn scratch_root(&self) -> &ScratchRoot {
        &self.scratch
    }

    /// Build the tool invocation for one job.
    ///
    /// The source path is always the last argument.
    pub fn build_command(
        &self,
        tool: &Path,
        source: &Path,
        target: &str,
        scratch: &ScratchEnvironment,
    ) -> ToolCommand {
        let outdir = output_dir(source);
        let mut cmd = ToolCommand::new(tool.to_path_buf());
        cmd.arg("--headless")
            .arg("--norestore")
            .arg("--nolockcheck")
            .arg("--convert-to")
            .arg(target)
            .arg("--outdir")
            .arg(outdir.to_string_lossy())
            .arg(format!("-env:UserInstallation={}", scratch.file_url()))
            .arg(source.to_string_lossy())
            .timeout(self.timeout);
        cmd
    }

    /// The checks that need no tool invocation: the source must exist and a
    /// tool must be configured. Returns the tool to run.
    pub fn precheck(&self, source: &Path) -> Result<&Path, ConversionError> {
        if !source.exists() {
            return Err(ConversionError::SourceNotFound);
        }
        self.tool.as_deref().ok_or(ConversionError::ToolUnavailable)
    }

    /// Convert `source` to `target`, returning the resolved output path.
    pub async fn try_convert(
        &self,
        source: &Path,
        target: &str,
    ) -> Result<PathBuf, ConversionError> {
        self.try_convert_gated(source, target, std::future::ready(Ok(())))
            .await
    }

    /// Like [`try_convert`](Self::try_convert), but awaits `gate` once the
    /// [`precheck`](Self::precheck) has passed and keeps whatever it yields
    /// alive until the tool has exited.
    ///
    /// Jobs that fail the precheck never wait on the gate.
    pub async fn try_convert_gated<G, F>(
        &self,
        source: &Path,
        target: &str,
        gate: F,
    ) -> Result<PathBuf, ConversionError>
    where
        F: Future<Output = Result<G, ConversionError>>,
    {
        let tool = self.precheck(source)?;
        let slot = gate.await?;

        // The guard also removes the profile if this future is dropped
        // mid-run (task abort); the child is killed by `kill_on_drop`.
        let mut scratch = self.scratch.acquire();
        let result = self
            .build_command(tool, source, target, &scratch)
            .execute()
            .await;
        scratch.release();
        drop(slot);

        let output = result.map_err(|e| match e {
            CommandError::TimedOut(d) => ConversionError::Timeout(d),
            CommandError::Spawn(e) => ConversionError::Spawn(e),
            CommandError::Io(e) => ConversionError::Io(e),
        })?;

        if !output.status.success() {
            tracing::debug!(
                status = %output.status,
                "tool exited unsuccessfully for {}",
                source.display()
            );
            return Err(ConversionError::process_failed(&output.stderr, &output.stdout));
        }

        let found = locate_output(source, target)
            .ok_or_else(|| ConversionError::OutputMissing(expected_output(source, target)))?;
        Ok(std::fs::canonicalize(&found)?)
    }

    /// Convert `source` to `target`. Always yields exactly one outcome.
    pub async fn convert(&self, source: &Path, target: &str) -> ConversionOutcome {
        self.convert_gated(source, target, std::future::ready(Ok(())))
            .await
    }

    /// [`convert`](Self::convert) with a gate, see
    /// [`try_convert_gated`](Self::try_convert_gated).
    pub async fn convert_gated<G, F>(&self, source: &Path, target: &str, gate: F) -> ConversionOutcome
    where
        F: Future<Output = Result<G, ConversionError>>,
    {
        let span = tracing::info_span!("convert", source = %source.display(), target_format = target);
        async {
            let start = Instant::now();
            tracing::info!("conversion started");

            let result = self.try_convert_gated(source, target, gate).await;
            let outcome = ConversionOutcome::from_result(source, result);

            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
            match &outcome {
                ConversionOutcome::Success { output_path, .. } => tracing::info!(
                    "conversion finished in {elapsed_ms:.1}ms: {}",
                    output_path.display()
                ),
                ConversionOutcome::Failure { error_message, .. } => {
                    tracing::warn!("conversion failed in {elapsed_ms:.1}ms: {error_message}")
                }
            }
            outcome
        }
        .instrument(span)
        .await
    }

    /// Blocking form of [`convert`](Self::convert), driven on a private
    /// current-thread runtime.
    ///
    /// Safe to call from inside an async runtime: a runtime cannot be
    /// nested on a thread that already runs one, so the job is then driven
    /// from a scoped helper thread while the caller blocks.
    pub fn convert_blocking(&self, source: &Path, target: &str) -> ConversionOutcome {
        if tokio::runtime::Handle::try_current().is_err() {
            return self.block_on_convert(source, target);
        }

        std::thread::scope(|scope| {
            scope
                .spawn(|| self.block_on_convert(source, target))
                .join()
                .unwrap_or_else(|_| {
                    ConversionOutcome::failure(
                        source,
                        &ConversionError::WorkerCrashed("conversion thread panicked".into()),
                    )
                })
        })
    }

    fn block_on_convert(&self, source: &Path, target: &str) -> ConversionOutcome {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => return ConversionOutcome::failure(source, &ConversionError::Io(e)),
        };
        runtime.block_on(self.convert(source, target))
    }
}

/// Directory the tool should write into: the source's parent, or the
/// current directory for a bare file name.
fn output_dir(source: &Path) -> PathBuf {
    match source.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
