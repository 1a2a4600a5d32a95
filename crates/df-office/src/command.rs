//! Builder for executing external tool commands with timeout support.

use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

/// Default command timeout: 5 minutes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// Why a command produced no [`ToolOutput`].
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to spawn: {0}")]
    Spawn(#[source] io::Error),

    #[error("I/O error waiting for process: {0}")]
    Io(#[source] io::Error),

    /// The deadline passed; the child has been killed and reaped.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// A builder for constructing and executing external tool invocations.
///
/// Unlike a plain [`std::process::Command`], a non-zero exit is *not* an
/// error here: the caller receives the status and both captured streams and
/// decides what they mean.
///
/// # Example
///
/// ```no_run
/// use df_office::ToolCommand;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), df_office::CommandError> {
/// let output = ToolCommand::new(PathBuf::from("soffice"))
///     .arg("--headless")
///     .arg("--version")
///     .timeout(Duration::from_secs(10))
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// The child is spawned with `kill_on_drop`, so dropping this future
    /// (task abort, enclosing timeout) also terminates the process.
    ///
    /// # Errors
    ///
    /// - [`CommandError::Spawn`] if the process could not be started.
    /// - [`CommandError::Io`] if waiting on the process or reading its pipes
    ///   failed.
    /// - [`CommandError::TimedOut`] if the process outlived the timeout. The
    ///   child has been killed and waited on before this is returned.
    pub async fn execute(&self) -> Result<ToolOutput, CommandError> {
        tracing::debug!("exec: {} {}", self.program.display(), self.args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(CommandError::Spawn)?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Drain both pipes while waiting so a chatty child cannot block on a
        // full pipe buffer.
        let waited = tokio::time::timeout(self.timeout, async {
            let (status, out, err) =
                tokio::join!(child.wait(), read_pipe(stdout), read_pipe(stderr));
            Ok::<_, io::Error>((status?, out?, err?))
        })
        .await;

        match waited {
            Ok(Ok((status, out, err))) => Ok(ToolOutput {
                status,
                stdout: String::from_utf8_lossy(&out).into_owned(),
                stderr: String::from_utf8_lossy(&err).into_owned(),
            }),
            Ok(Err(e)) => Err(CommandError::Io(e)),
            Err(_elapsed) => {
                // `kill` sends SIGKILL and then waits, so no zombie is left.
                if let Err(e) = child.kill().await {
                    tracing::warn!(
                        "failed to kill {} after timeout: {e}",
                        self.program.display()
                    );
                }
                Err(CommandError::TimedOut(self.timeout))
            }
        }
    }
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
