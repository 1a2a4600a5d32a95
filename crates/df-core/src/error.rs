//! Error types for docforge.
//!
//! Two layers exist:
//!
//! - [`Error`] covers engine-level faults: invalid settings, malformed
//!   batches, and I/O or tool problems outside a single conversion. These are
//!   returned to the caller as `Err`.
//! - [`ConversionError`] covers everything that can go wrong while converting
//!   one document. These never escape the engine as `Err`; they are folded
//!   into [`ConversionOutcome::Failure`](crate::ConversionOutcome).

use std::path::PathBuf;
use std::time::Duration;

/// Unified engine-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Engine settings failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A batch was rejected before any job was submitted.
    #[error("Scheduling error: {0}")]
    Scheduling(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// An external tool (soffice, apt-get) returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Build the error returned when a per-file target list does not line up
    /// with the submitted paths.
    pub fn length_mismatch(targets: usize, paths: usize) -> Self {
        Error::Scheduling(format!(
            "Length of 'to' ({targets}) must match number of file_paths ({paths})"
        ))
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of a single conversion.
///
/// The `Display` text of each variant is the message reported to callers in
/// [`ConversionOutcome::Failure`](crate::ConversionOutcome).
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("File not found")]
    SourceNotFound,

    #[error("LibreOffice not found in PATH")]
    ToolUnavailable,

    /// The tool exited non-zero. Carries stderr, stdout, or a fallback.
    #[error("{0}")]
    ProcessFailed(String),

    #[error("Conversion timed out after {:?}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Conversion succeeded but output file not found: {}", .0.display())]
    OutputMissing(PathBuf),

    /// The process could not be spawned.
    #[error("{0}")]
    Spawn(std::io::Error),

    /// I/O failure while talking to the process or inspecting its output.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The worker running the job panicked or disappeared.
    #[error("{0}")]
    WorkerCrashed(String),
}

impl ConversionError {
    /// Build a [`ConversionError::ProcessFailed`] from captured output,
    /// preferring stderr, then stdout, then a fixed message.
    pub fn process_failed(stderr: &str, stdout: &str) -> Self {
        let stderr = stderr.trim();
        let stdout = stdout.trim();
        let message = if !stderr.is_empty() {
            stderr
        } else if !stdout.is_empty() {
            stdout
        } else {
            "Conversion failed"
        };
        ConversionError::ProcessFailed(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = Error::Validation("max_concurrency must be >= 1, got 0".into());
        assert_eq!(
            err.to_string(),
            "Validation error: max_concurrency must be >= 1, got 0"
        );
    }

    #[test]
    fn length_mismatch_names_both_counts() {
        let err = Error::length_mismatch(2, 5);
        assert!(matches!(err, Error::Scheduling(_)));
        let msg = err.to_string();
        assert!(msg.contains("(2)"), "{msg}");
        assert!(msg.contains("(5)"), "{msg}");
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("apt-get", "exit code 100");
        assert_eq!(err.to_string(), "Tool error [apt-get]: exit code 100");
    }

    #[test]
    fn conversion_messages() {
        assert_eq!(ConversionError::SourceNotFound.to_string(), "File not found");
        assert!(ConversionError::ToolUnavailable
            .to_string()
            .contains("not found"));
        assert_eq!(
            ConversionError::Timeout(Duration::from_millis(1500)).to_string(),
            "Conversion timed out after 1.5s"
        );
        assert_eq!(
            ConversionError::Timeout(Duration::from_secs(300)).to_string(),
            "Conversion timed out after 300.0s"
        );
        assert_eq!(
            ConversionError::OutputMissing(PathBuf::from("/tmp/a.pdf")).to_string(),
            "Conversion succeeded but output file not found: /tmp/a.pdf"
        );
    }

    #[test]
    fn process_failed_prefers_stderr() {
        let err = ConversionError::process_failed("  bad filter \n", "ignored");
        assert_eq!(err.to_string(), "bad filter");
    }

    #[test]
    fn process_failed_falls_back_to_stdout_then_literal() {
        let err = ConversionError::process_failed("   ", " some stdout ");
        assert_eq!(err.to_string(), "some stdout");

        let err = ConversionError::process_failed("", "");
        assert_eq!(err.to_string(), "Conversion failed");
    }
}
