//! ptydrive: drive interactive terminal programs from Rust
//!
//! ptydrive spawns a command under a pseudo-terminal, feeds it input,
//! accumulates its output incrementally, and blocks the caller until an
//! expected pattern appears — the classic "expect" automation style, for
//! programs that insist on a real terminal (`gnutls-cli`, `ssh`, login
//! shims, installers).
//!
//! # How it works
//!
//! - **Transport**: stdout runs through a fresh PTY; stdin and stderr are
//!   plain pipes, so input bypasses the terminal line discipline and
//!   diagnostics stay separable from terminal output.
//! - **Reaper**: a dedicated thread blocks on the child's exit exactly once,
//!   so no session ever leaves a zombie behind.
//! - **Accumulator**: a cooperative reader performs one non-blocking read
//!   per resumption and appends to a shared buffer in read order; nothing
//!   read from the OS is ever dropped.
//! - **Wait loop**: [`Session::wait`] resumes the reader, tests your pattern
//!   against the whole buffer, and sleeps between attempts until a match,
//!   process death, or the configured deadline.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ptydrive::{Pattern, Session};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::builder()
//!         .timeout(Duration::from_secs(30))
//!         .spawn("gnutls-cli --insecure -s -p 587 smtp.gmail.com")?;
//!
//!     // Block until the server banner shows up
//!     session.wait(&Pattern::regex("220 .*ESMTP")?).await?;
//!
//!     // Talk to it
//!     session.send_line("EHLO example.org").await?;
//!     session.wait(&Pattern::exact("250")).await?;
//!
//!     // Hand the transcript off and clear the buffer
//!     session.flush_with(|bytes| println!("{}", String::from_utf8_lossy(bytes)));
//!
//!     Ok(())
//! }
//! ```
//!
//! # Patterns
//!
//! Matching is entirely caller-supplied — the engine never interprets output
//! on its own:
//!
//! ```rust,no_run
//! use ptydrive::{Pattern, Session};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut session = Session::spawn("cat")?;
//! // Exact substring (fastest)
//! session.wait(&Pattern::exact("password: ")).await?;
//!
//! // Regex, with captures reported back
//! session.wait(&Pattern::regex(r"uid=(\d+)")?).await?;
//!
//! // Shell-style glob
//! session.wait(&Pattern::glob("core.*")).await?;
//! # Ok(())
//! # }
//! ```
//!
//! A match never consumes the buffer: repeating a `wait` without an
//! intervening [`Session::flush`] matches again immediately. Flushing is
//! always an explicit caller decision.
//!
//! # Liveness and typed races
//!
//! Driving a process that may exit at any moment is full of benign races,
//! and they are reported as values rather than errors:
//!
//! - a write that loses the race with exit returns
//!   [`WriteOutcome::PipeClosed`]
//! - a `wait` that watches the output source disappear returns
//!   [`WaitOutcome::SourceClosed`]
//! - operations attempted *after* exit was already observed fail with
//!   [`DriveError::DeadProcess`] — that one is caller misuse
//!
//! Signals are the exception: [`Session::signal`] on a reaped pid propagates
//! the OS error.
//!
//! ```rust,no_run
//! use ptydrive::{Session, Signal};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! # let mut session = Session::spawn("sleep 60")?;
//! session.signal(Signal::SIGINT)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod buffer;
mod pattern;
mod result;
mod session;

// Public API exports
pub use pattern::{Matcher, Pattern};
pub use result::{DriveError, MatchInfo, PatternError, WaitOutcome, WriteOutcome};
pub use session::{Session, SessionBuilder};

// Re-export so callers don't need a direct nix dependency for signal names
pub use nix::sys::signal::Signal;
