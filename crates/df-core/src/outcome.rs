//! Conversion requests and outcomes.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConversionError, Error, Result};

/// One unit of work: convert `source` into the `target` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub source: PathBuf,
    /// Target format identifier as understood by the tool (e.g. `"pdf"`).
    pub target: String,
}

impl ConversionRequest {
    pub fn new(source: impl Into<PathBuf>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Target formats for a batch: one shared format, or one per path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetFormats {
    Single(String),
    PerFile(Vec<String>),
}

impl TargetFormats {
    /// Pair each path with its target format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scheduling`] if a per-file list does not have exactly
    /// one entry per path.
    pub fn pair_with<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<ConversionRequest>> {
        match self {
            TargetFormats::Single(target) => Ok(paths
                .iter()
                .map(|p| ConversionRequest::new(p.as_ref(), target.clone()))
                .collect()),
            TargetFormats::PerFile(targets) => {
                if targets.len() != paths.len() {
                    return Err(Error::length_mismatch(targets.len(), paths.len()));
                }
                Ok(paths
                    .iter()
                    .zip(targets)
                    .map(|(p, t)| ConversionRequest::new(p.as_ref(), t.clone()))
                    .collect())
            }
        }
    }
}

impl From<&str> for TargetFormats {
    fn from(s: &str) -> Self {
        TargetFormats::Single(s.to_string())
    }
}

impl From<String> for TargetFormats {
    fn from(s: String) -> Self {
        TargetFormats::Single(s)
    }
}

impl From<Vec<String>> for TargetFormats {
    fn from(v: Vec<String>) -> Self {
        TargetFormats::PerFile(v)
    }
}

impl From<&[&str]> for TargetFormats {
    fn from(v: &[&str]) -> Self {
        TargetFormats::PerFile(v.iter().map(|s| s.to_string()).collect())
    }
}

/// Coarse classification of a failed conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    SourceNotFound,
    ToolUnavailable,
    ProcessFailed,
    Timeout,
    OutputMissing,
    Io,
    WorkerCrashed,
}

impl From<&ConversionError> for FailureKind {
    fn from(err: &ConversionError) -> Self {
        match err {
            ConversionError::SourceNotFound => FailureKind::SourceNotFound,
            ConversionError::ToolUnavailable => FailureKind::ToolUnavailable,
            ConversionError::ProcessFailed(_) => FailureKind::ProcessFailed,
            ConversionError::Timeout(_) => FailureKind::Timeout,
            ConversionError::OutputMissing(_) => FailureKind::OutputMissing,
            ConversionError::Spawn(_) | ConversionError::Io(_) => FailureKind::Io,
            ConversionError::WorkerCrashed(_) => FailureKind::WorkerCrashed,
        }
    }
}

/// The result of one conversion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success {
        source_path: PathBuf,
        output_path: PathBuf,
    },
    Failure {
        source_path: PathBuf,
        kind: FailureKind,
        error_message: String,
    },
}

impl ConversionOutcome {
    pub fn success(source_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        ConversionOutcome::Success {
            source_path: source_path.into(),
            output_path: output_path.into(),
        }
    }

    pub fn failure(source_path: impl Into<PathBuf>, error: &ConversionError) -> Self {
        ConversionOutcome::Failure {
            source_path: source_path.into(),
            kind: FailureKind::from(error),
            error_message: error.to_string(),
        }
    }

    /// Fold a converter result into an outcome for `source_path`.
    pub fn from_result(
        source_path: impl Into<PathBuf>,
        result: std::result::Result<PathBuf, ConversionError>,
    ) -> Self {
        match result {
            Ok(output) => Self::success(source_path, output),
            Err(e) => Self::failure(source_path, &e),
        }
    }

    pub fn source_path(&self) -> &Path {
        match self {
            ConversionOutcome::Success { source_path, .. }
            | ConversionOutcome::Failure { source_path, .. } => source_path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success { .. })
    }

    pub fn output_path(&self) -> Option<&Path> {
        match self {
            ConversionOutcome::Success { output_path, .. } => Some(output_path),
            ConversionOutcome::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ConversionOutcome::Failure { error_message, .. } => Some(error_message),
            ConversionOutcome::Success { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            ConversionOutcome::Failure { kind, .. } => Some(*kind),
            ConversionOutcome::Success { .. } => None,
        }
    }
}
