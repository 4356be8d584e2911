use thiserror::Error;

/// Errors surfaced to the orchestrator's caller.
#[derive(Error, Debug)]
pub enum GeneratorError {
    /// The mode bits selected neither PDF nor image output.
    #[error("Mode {0} is not defined")]
    UnknownMode(u8),

    /// The worker exited with a non-zero status.
    #[error("Render worker exited with code {code:?}: {stderr}")]
    ProcessFailed {
        /// The command line that was executed.
        command: Vec<String>,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured stdout of the worker.
        console: String,
        /// Captured stderr of the worker.
        stderr: String,
    },

    /// The worker was killed after exceeding the configured timeout.
    #[error("Render worker timed out after {timeout}s")]
    Timeout {
        /// The command line that was executed.
        command: Vec<String>,
        /// The configured bound, in seconds.
        timeout: u64,
    },

    /// Writing, reading or deleting a temp file failed, or the worker could
    /// not be spawned.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
