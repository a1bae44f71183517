//! Session management for PTY-driven process automation

mod builder;
mod collector;
mod reaper;
mod transport;

pub use builder::SessionBuilder;

use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use tracing::debug;

use crate::buffer::OutputBuffer;
use crate::pattern::Pattern;
use crate::result::{DriveError, MatchInfo, WaitOutcome, WriteOutcome};
use collector::Collector;
use reaper::Reaper;

/// A child process being driven through a pseudo-terminal.
///
/// A `Session` owns the pty master, the child's input pipe, its stderr pipe,
/// and the process id, for the lifetime of the spawned child. Output is
/// accumulated into an internal buffer by a cooperative reader that the
/// [`wait`](Session::wait) loop drives; input goes through
/// [`write`](Session::write); signals through [`signal`](Session::signal).
///
/// There is no explicit close: teardown is implicit via process exit, and a
/// dedicated reaper thread guarantees the child never lingers as a zombie.
///
/// # Examples
///
/// ```no_run
/// use ptydrive::{Pattern, Session};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::spawn("ssh build@ci.internal")?;
///
/// session.wait(&Pattern::exact("password: ")).await?;
/// session.send_line("hunter2").await?;
/// session.wait(&Pattern::regex(r"\$ ")?).await?;
/// # Ok(())
/// # }
/// ```
pub struct Session {
    pub(crate) master: Arc<OwnedFd>,
    pub(crate) input: Arc<OwnedFd>,
    pub(crate) err_read: OwnedFd,
    pub(crate) pid: i32,
    pub(crate) reaper: Reaper,
    pub(crate) collector: Collector,
    pub(crate) buffer: OutputBuffer,
    pub(crate) poll_interval: Duration,
    pub(crate) timeout: Option<Duration>,
}

impl Session {
    /// Create a new session builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Spawn a command with default configuration (shorthand for
    /// `Session::builder().spawn(command)`).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ptydrive::Session;
    ///
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let session = Session::spawn("gnutls-cli --insecure -s -p 587 smtp.gmail.com")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn(command: &str) -> Result<Self, DriveError> {
        SessionBuilder::new().spawn(command)
    }

    /// Wait until `pattern` appears in the accumulated output.
    ///
    /// Polls the output reader, testing the pattern against the whole buffer
    /// after each resumption and sleeping the poll interval between
    /// attempts. On a match the buffer is left intact — a repeated `wait`
    /// without an intervening [`flush`](Session::flush) matches again
    /// immediately; clearing is always the caller's move.
    ///
    /// Returns [`WaitOutcome::SourceClosed`] if the child exits and the
    /// reader terminates before the pattern appears. That is not an error:
    /// the source is simply gone.
    ///
    /// # Errors
    ///
    /// - [`DriveError::DeadProcess`] if the child's exit had already been
    ///   observed when `wait` was called
    /// - [`DriveError::ReaderTerminated`] if the reader had already finished
    ///   its final drain when `wait` was called
    /// - [`DriveError::Timeout`] if the configured deadline expires
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ptydrive::{Pattern, Session};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let mut session = Session::spawn("login-shim")?;
    /// let outcome = session.wait(&Pattern::regex("login:")?).await?;
    /// if let Some(info) = outcome.match_info() {
    ///     println!("prompt after {} bytes of banner", info.before.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait(&mut self, pattern: &Pattern) -> Result<WaitOutcome, DriveError> {
        self.wait_inner(pattern, None).await
    }

    /// Like [`wait`](Session::wait), overriding the read size per
    /// resumption for this call only.
    ///
    /// Rarely needed — the default chunk size is fine for prompt-sized
    /// output — but exposed for callers tuning how greedily the pty is
    /// drained.
    pub async fn wait_chunked(
        &mut self,
        pattern: &Pattern,
        read_len: usize,
    ) -> Result<WaitOutcome, DriveError> {
        self.wait_inner(pattern, Some(read_len)).await
    }

    async fn wait_inner(
        &mut self,
        pattern: &Pattern,
        read_len: Option<usize>,
    ) -> Result<WaitOutcome, DriveError> {
        if !self.reaper.is_alive() {
            return Err(DriveError::DeadProcess { pid: self.pid });
        }
        if self.collector.is_terminated() {
            return Err(DriveError::ReaderTerminated);
        }

        let matcher = pattern.to_matcher()?;
        let started = Instant::now();

        loop {
            // Liveness is sampled per resumption: death between the sample
            // and the read just means the final drain runs next time around.
            let alive = self.reaper.is_alive();
            match self.collector.resume(&mut self.buffer, alive, read_len) {
                Ok(_) => {}
                Err(DriveError::ReaderTerminated) => return Ok(WaitOutcome::SourceClosed),
                Err(e) => return Err(e),
            }

            if let Some(found) = matcher.find(self.buffer.as_bytes()) {
                let bytes = self.buffer.as_bytes();
                return Ok(WaitOutcome::Matched(MatchInfo {
                    start: found.start,
                    end: found.end,
                    matched: String::from_utf8_lossy(&bytes[found.start..found.end]).into_owned(),
                    before: String::from_utf8_lossy(&bytes[..found.start]).into_owned(),
                    captures: found.captures,
                }));
            }

            if let Some(limit) = self.timeout {
                if started.elapsed() >= limit {
                    return Err(DriveError::Timeout { duration: limit });
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Write bytes to the child's standard input.
    ///
    /// Even with the liveness check passing, the child can exit before the
    /// bytes arrive; that benign race surfaces as
    /// [`WriteOutcome::PipeClosed`] rather than an error.
    ///
    /// # Errors
    ///
    /// [`DriveError::DeadProcess`] if the child's exit has already been
    /// observed.
    pub async fn write(&mut self, data: &[u8]) -> Result<WriteOutcome, DriveError> {
        if !self.reaper.is_alive() {
            return Err(DriveError::DeadProcess { pid: self.pid });
        }

        let fd = Arc::clone(&self.input);
        let data = data.to_vec();

        // A full pipe blocks; keep that off the async runtime.
        tokio::task::spawn_blocking(move || write_all(&fd, &data))
            .await
            .map_err(|e| DriveError::Io(std::io::Error::other(e)))?
    }

    /// Write a line to the child's standard input (appends `\n`).
    pub async fn send_line(&mut self, line: &str) -> Result<WriteOutcome, DriveError> {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');
        self.write(&data).await
    }

    /// Deliver an OS signal to the child.
    ///
    /// No liveness check: delivery to an already-reaped pid fails with the
    /// OS error (`ESRCH`), propagated to the caller.
    ///
    /// # Errors
    ///
    /// [`DriveError::Signal`] carrying the errno from `kill(2)`.
    pub fn signal(&self, signal: Signal) -> Result<(), DriveError> {
        debug!(pid = self.pid, ?signal, "delivering signal");
        kill(Pid::from_raw(self.pid), signal).map_err(|source| DriveError::Signal {
            signal,
            pid: self.pid,
            source,
        })
    }

    /// Reset the output buffer to empty.
    ///
    /// When to flush is application-specific; `wait` never clears the buffer
    /// on its own. Always succeeds, idempotent on an empty buffer.
    pub fn flush(&mut self) {
        self.buffer.reset();
    }

    /// Reset the output buffer, handing the observer the contents first.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn example(session: &mut ptydrive::Session) {
    /// let mut transcript = Vec::new();
    /// session.flush_with(|bytes| transcript.extend_from_slice(bytes));
    /// # }
    /// ```
    pub fn flush_with<F>(&mut self, observer: F)
    where
        F: FnOnce(&[u8]),
    {
        observer(self.buffer.as_bytes());
        self.buffer.reset();
    }

    /// Whether the child is still running.
    ///
    /// Derived from the reaper: true until the background wait has collected
    /// the child's exit status, and never flips back.
    pub fn is_alive(&self) -> bool {
        self.reaper.is_alive()
    }

    /// The child's exit status, once reaped.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.reaper.exit_status()
    }

    /// The child's process id.
    pub fn pid(&self) -> i32 {
        self.pid
    }

    /// The pty master, for callers needing raw access (e.g. `TIOCSWINSZ`).
    pub fn master_fd(&self) -> BorrowedFd<'_> {
        self.master.as_fd()
    }

    /// Read end of the child's stderr pipe.
    ///
    /// Stderr bypasses the pty and the output buffer entirely; reading it is
    /// left to the caller.
    pub fn stderr_fd(&self) -> BorrowedFd<'_> {
        self.err_read.as_fd()
    }

    /// Current accumulated output.
    pub fn output(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Current accumulated output as a string slice, or `""` if the buffer
    /// is not valid UTF-8.
    pub fn output_str(&self) -> &str {
        self.buffer.as_str()
    }
}

fn write_all(fd: &OwnedFd, data: &[u8]) -> Result<WriteOutcome, DriveError> {
    let mut written = 0;
    while written < data.len() {
        match nix::unistd::write(fd, &data[written..]) {
            Ok(n) => written += n,
            Err(Errno::EINTR) => continue,
            Err(Errno::EPIPE) => return Ok(WriteOutcome::PipeClosed),
            Err(e) => return Err(DriveError::Io(std::io::Error::from(e))),
        }
    }
    Ok(WriteOutcome::Written(written))
}
