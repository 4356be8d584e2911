//! Bounded worker process invocation.
//!
//! One worker process per call: spawn, capture stdout/stderr, wait for exit
//! or kill on timeout. The timeout here is the single source of cancellation
//! for a render; the worker does not run page-level timeouts of its own.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::GeneratorError;

/// Captured output of a successfully finished worker.
#[derive(Debug)]
pub(crate) struct ProcessOutput {
    pub stdout: String,
}

/// Run `command` with the extra environment `env`, bounded by `timeout`.
///
/// The child inherits the parent environment plus `env`, runs in the current
/// working directory, and is killed (then reaped) if the bound elapses.
pub(crate) async fn run(
    command: &[String],
    env: &[(String, String)],
    timeout: Duration,
) -> Result<ProcessOutput, GeneratorError> {
    let Some((program, args)) = command.split_first() else {
        return Err(GeneratorError::Io(std::io::Error::new(
            ErrorKind::InvalidInput,
            "worker command is empty",
        )));
    };

    let mut child = Command::new(program)
        .args(args)
        .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    // Drain both pipes concurrently so the child never blocks on a full
    // pipe buffer while we wait for it.
    let stdout_task = tokio::spawn(drain(child.stdout.take()));
    let stderr_task = tokio::spawn(drain(child.stderr.take()));

    let status = tokio::select! {
        status = child.wait() => status?,
        _ = tokio::time::sleep(timeout) => {
            warn!(?command, seconds = timeout.as_secs(), "worker exceeded timeout, killing");
            let _ = child.start_kill();
            let _ = child.wait().await;
            return Err(GeneratorError::Timeout {
                command: command.to_vec(),
                timeout: timeout.as_secs(),
            });
        }
    };

    let stdout = stdout_task.await.unwrap_or_default();
    let stderr = stderr_task.await.unwrap_or_default();
    debug!(code = ?status.code(), "worker exited");

    if !status.success() {
        return Err(GeneratorError::ProcessFailed {
            command: command.to_vec(),
            code: status.code(),
            console: stdout,
            stderr,
        });
    }

    Ok(ProcessOutput { stdout })
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = String::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_string(&mut buf).await;
    }
    buf
}
