//! Process Invoker
//!
//! Spawns the engine binary with a discrete argument vector and captures its
//! output.
//!
//! # Security
//!
//! - Uses `tokio::process::Command` directly, never a shell
//! - [`ArgVector`] has no operation that joins its items into a single
//!   command line, so metacharacters in a value stay inside that one argument
//! - Exit status is reported but never turned into an error; the engine
//!   reports operation failures through its own output
//!
//! No timeout is applied and a spawned process is not killed if the caller
//! stops waiting for it.

use super::error::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info, trace, warn};

/// Read buffer size for draining child pipes
const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Ordered list of discrete process arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgVector(Vec<String>);

impl ArgVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one argument
    pub fn push(&mut self, arg: impl Into<String>) -> &mut Self {
        self.0.push(arg.into());
        self
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl<S: Into<String>> FromIterator<S> for ArgVector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Captured output of one engine invocation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationOutput {
    /// Standard output, lossily decoded as UTF-8
    pub stdout: String,

    /// Standard error, lossily decoded as UTF-8
    pub stderr: String,

    /// Exit code (None if terminated by a signal); informational only
    pub exit_code: Option<i32>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: f64,
}

impl InvocationOutput {
    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "exit code: {:?}, {:.0}ms, {} bytes stdout, {} bytes stderr",
            self.exit_code,
            self.duration_ms,
            self.stdout.len(),
            self.stderr.len()
        )
    }
}

/// Something that can run a binary with an argument vector
///
/// The gateway depends on this trait so tests can observe invocations
/// without spawning processes.
#[async_trait]
pub trait ProcessInvoker: Send + Sync {
    async fn invoke(
        &self,
        binary: &Path,
        argv: &ArgVector,
    ) -> Result<InvocationOutput, GatewayError>;
}

/// Invoker backed by `tokio::process`
#[derive(Debug, Clone, Default)]
pub struct TokioInvoker {
    /// Working directory for the child (default: inherited)
    working_dir: Option<PathBuf>,
}

impl TokioInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run children from a specific working directory
    pub fn with_working_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: Some(dir.into()),
        }
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }
}

#[async_trait]
impl ProcessInvoker for TokioInvoker {
    async fn invoke(
        &self,
        binary: &Path,
        argv: &ArgVector,
    ) -> Result<InvocationOutput, GatewayError> {
        let start = Instant::now();
        info!(binary = %binary.display(), args = argv.len(), "Invoking engine");
        debug!(argv = ?argv.as_slice(), "Argument vector");

        let mut command = Command::new(binary);
        command
            .args(argv.iter())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(ref dir) = self.working_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| GatewayError::Spawn {
            binary: binary.to_path_buf(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("child stdout was not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("child stderr was not captured"))?;

        // Drain both pipes while waiting so a chatty child never blocks on a
        // full pipe buffer
        let (stdout, stderr, status) = tokio::try_join!(
            drain(stdout, "stdout"),
            drain(stderr, "stderr"),
            child.wait()
        )?;

        let output = InvocationOutput {
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            exit_code: status.code(),
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
        };

        if status.success() {
            info!("Engine finished: {}", output.summary());
        } else {
            warn!("Engine exited unsuccessfully: {}", output.summary());
        }

        Ok(output)
    }
}

/// Accumulate a child pipe chunk by chunk until EOF
async fn drain<R>(mut reader: R, stream: &'static str) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        trace!(stream, bytes = n, "Read chunk");
        collected.extend_from_slice(&chunk[..n]);
    }

    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arg_vector_preserves_order() {
        let mut argv = ArgVector::new();
        argv.push("--headless").push("--path").push("/tmp/proj");

        assert_eq!(argv.len(), 3);
        assert_eq!(argv.as_slice(), &["--headless", "--path", "/tmp/proj"]);
        assert!(!argv.is_empty());
    }

    #[test]
    fn test_arg_vector_from_iter() {
        let argv: ArgVector = ["a b", "c;d"].into_iter().collect();
        assert_eq!(argv.as_slice(), &["a b".to_string(), "c;d".to_string()]);
        assert!(ArgVector::new().is_empty());
    }

    #[test]
    fn test_summary() {
        let output = InvocationOutput {
            stdout: "ok".to_string(),
            stderr: String::new(),
            exit_code: Some(0),
            duration_ms: 12.0,
        };
        let summary = output.summary();
        assert!(summary.contains("Some(0)"));
        assert!(summary.contains("2 bytes stdout"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_invoke_captures_both_streams() {
        let invoker = TokioInvoker::new();
        let argv: ArgVector = ["-c", "echo out; echo err >&2"].into_iter().collect();

        let output = invoker.invoke(Path::new("/bin/sh"), &argv).await.unwrap();

        assert_eq!(output.stdout, "out\n");
        assert_eq!(output.stderr, "err\n");
        assert_eq!(output.exit_code, Some(0));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_is_not_an_error() {
        let invoker = TokioInvoker::new();
        let argv: ArgVector = ["-c", "echo 'ERROR: scene missing'; exit 3"]
            .into_iter()
            .collect();

        let output = invoker.invoke(Path::new("/bin/sh"), &argv).await.unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert!(output.stdout.contains("scene missing"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_metacharacters_stay_inside_one_argument() {
        let invoker = TokioInvoker::new();
        let argv: ArgVector = [
            "-c",
            "printf '%s\\n' \"$@\"",
            "sh",
            "a b",
            "$(echo injected)",
            "; touch /tmp/should-not-exist",
        ]
        .into_iter()
        .collect();

        let output = invoker.invoke(Path::new("/bin/sh"), &argv).await.unwrap();

        let lines: Vec<&str> = output.stdout.lines().collect();
        assert_eq!(
            lines,
            vec!["a b", "$(echo injected)", "; touch /tmp/should-not-exist"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_large_output_is_fully_collected() {
        let invoker = TokioInvoker::new();
        let argv: ArgVector = ["-c", "seq 1 20000; seq 1 20000 >&2"].into_iter().collect();

        let output = invoker.invoke(Path::new("/bin/sh"), &argv).await.unwrap();

        assert_eq!(output.stdout.lines().count(), 20000);
        assert_eq!(output.stderr.lines().count(), 20000);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_working_directory() {
        let invoker = TokioInvoker::with_working_dir("/");
        let argv: ArgVector = ["-c", "pwd"].into_iter().collect();

        let output = invoker.invoke(Path::new("/bin/sh"), &argv).await.unwrap();

        assert_eq!(output.stdout.trim(), "/");
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_failure() {
        let invoker = TokioInvoker::new();
        let argv = ArgVector::new();

        let err = invoker
            .invoke(Path::new("/nonexistent/godot-binary-12345"), &argv)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Spawn { .. }));
        assert!(err.to_string().contains("Failed to spawn"));
    }
}
