//! Session builder for configuration

use std::sync::Arc;
use std::time::Duration;

use crate::buffer::OutputBuffer;
use crate::result::DriveError;
use crate::session::collector::Collector;
use crate::session::reaper::Reaper;
use crate::session::transport::{self, Transport};
use crate::session::Session;

/// Default read size per accumulator resumption (in bytes)
const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default sleep between poll attempts in the wait loop
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default deadline for wait operations (in seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default PTY rows
const DEFAULT_PTY_ROWS: u16 = 24;

/// Default PTY columns
const DEFAULT_PTY_COLS: u16 = 80;

/// Builder for configuring and spawning sessions.
///
/// # Defaults
///
/// - Read chunk: 1000 bytes
/// - Poll interval: 100 ms
/// - Wait timeout: 30 seconds (see [`SessionBuilder::no_timeout`])
/// - PTY size: 24 rows × 80 columns
///
/// # Examples
///
/// ```no_run
/// use ptydrive::Session;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let session = Session::builder()
///     .timeout(Duration::from_secs(60))
///     .poll_interval(Duration::from_millis(50))
///     .pty_size(40, 120)
///     .spawn("gnutls-cli --insecure -s -p 587 smtp.example.com")?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    chunk_size: usize,
    poll_interval: Duration,
    timeout: Option<Duration>,
    pty_rows: u16,
    pty_cols: u16,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            pty_rows: DEFAULT_PTY_ROWS,
            pty_cols: DEFAULT_PTY_COLS,
        }
    }

    /// Set the default read size per accumulator resumption.
    ///
    /// Individual `wait_chunked` calls can still override this per attempt.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Set the sleep between poll attempts in the wait loop.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the deadline for `wait` operations.
    ///
    /// If a pattern has not matched within this duration, `wait` returns
    /// [`DriveError::Timeout`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disable the wait deadline entirely.
    ///
    /// With no timeout, `wait` polls until the pattern matches or the child
    /// is gone — a caller wanting a bound must impose it externally.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Set the PTY window size the child will see.
    pub fn pty_size(mut self, rows: u16, cols: u16) -> Self {
        self.pty_rows = rows;
        self.pty_cols = cols;
        self
    }

    /// Spawn `command` under a fresh pseudo-terminal and return the session.
    ///
    /// A plain command is exec'd directly; one containing shell
    /// metacharacters runs through `/bin/sh -c`, so script-style one-liners
    /// work too.
    ///
    /// # Errors
    ///
    /// Returns [`DriveError::Pty`] if fd plumbing fails and
    /// [`DriveError::Spawn`] if the command cannot be started. Both are
    /// fatal: no session is produced and nothing is retried.
    pub fn spawn(self, command: &str) -> Result<Session, DriveError> {
        let Transport {
            master,
            input,
            err_read,
            child,
        } = transport::spawn(command, self.pty_rows, self.pty_cols)?;

        let pid = child.id() as i32;
        let master = Arc::new(master);
        let collector = Collector::new(Arc::clone(&master), self.chunk_size);
        let reaper = Reaper::spawn(child);

        Ok(Session {
            master,
            input: Arc::new(input),
            err_read,
            pid,
            reaper,
            collector,
            buffer: OutputBuffer::new(),
            poll_interval: self.poll_interval,
            timeout: self.timeout,
        })
    }
}
