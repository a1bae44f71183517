//! Error types for session driving

use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::Signal;
use thiserror::Error;

/// Errors that can occur while driving a pseudo-terminal session.
///
/// Most `Session` methods return `Result<T, DriveError>`. Transient
/// conditions — a read that would block, a write against a pipe the child
/// already closed — are deliberately *not* errors; they surface as typed
/// variants of [`crate::WaitOutcome`] and [`crate::WriteOutcome`] instead.
///
/// # Examples
///
/// ```no_run
/// use ptydrive::{DriveError, Pattern, Session};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::spawn("cat")?;
///
/// match session.wait(&Pattern::exact("ready")).await {
///     Ok(outcome) => println!("matched: {}", outcome.is_match()),
///     Err(DriveError::DeadProcess { pid }) => {
///         eprintln!("process {pid} exited before we could wait");
///     }
///     Err(e) => return Err(e.into()),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Error, Debug)]
pub enum DriveError {
    /// The command could not be spawned.
    ///
    /// Fatal and surfaced at construction; no `Session` is produced. This is
    /// an environment or configuration failure, never retried internally.
    #[error("failed to spawn process: {0}")]
    Spawn(#[source] std::io::Error),

    /// PTY or pipe plumbing failed during construction.
    ///
    /// Covers `openpty`, pipe allocation, and switching the master to
    /// non-blocking mode.
    #[error("failed to set up pty transport: {0}")]
    Pty(#[source] Errno),

    /// Operation attempted after the child was observed to have exited.
    ///
    /// Returned by `wait` and `write` once the reaper has collected the
    /// child. Recoverable by the caller; nothing is retried internally.
    #[error("process {pid} has already exited")]
    DeadProcess {
        /// Process id of the reaped child.
        pid: i32,
    },

    /// The output reader has already terminated and cannot be resumed.
    ///
    /// Raised when `wait` is entered after the reader performed its final
    /// drain. Treated as a usage error, not a transient condition: once
    /// terminated, no more output will ever arrive.
    #[error("output reader already terminated")]
    ReaderTerminated,

    /// Deadline expired before the pattern matched.
    ///
    /// Only produced when a timeout is configured on the session; see
    /// [`crate::SessionBuilder::timeout`].
    #[error("timeout waiting for pattern (after {duration:?})")]
    Timeout {
        /// Duration that was waited before giving up.
        duration: Duration,
    },

    /// Signal delivery failed.
    ///
    /// `ESRCH` means the pid has already been reaped; unlike the write-side
    /// broken-pipe race, this is propagated to the caller.
    #[error("failed to send signal {signal:?} to pid {pid}: {source}")]
    Signal {
        /// The signal that failed to send.
        signal: Signal,
        /// The target process id.
        pid: i32,
        /// The underlying OS error.
        #[source]
        source: Errno,
    },

    /// Invalid pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] PatternError),

    /// Residual I/O failure outside the absorbed transient cases.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to pattern construction.
#[derive(Error, Debug)]
pub enum PatternError {
    /// Invalid regex syntax.
    #[error("invalid regex: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Invalid glob syntax.
    #[error("invalid glob: {0}")]
    InvalidGlob(String),

    /// Empty patterns match nothing and are rejected up front.
    #[error("pattern cannot be empty")]
    EmptyPattern,
}
