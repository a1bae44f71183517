//! Result types for wait and write operations

mod error;

pub use error::{DriveError, PatternError};

/// Outcome of a successful [`crate::Session::wait`] call.
///
/// A `wait` that returns `Ok` either found the pattern or watched the output
/// source disappear while polling. Both are normal protocol outcomes; the
/// error path is reserved for precondition failures (dead process, dead
/// reader) and deadline expiry.
#[derive(Debug, Clone)]
pub enum WaitOutcome {
    /// The pattern matched somewhere in the accumulated output.
    ///
    /// The buffer is left intact — repeating the same `wait` without an
    /// intervening flush matches again immediately. Flushing is the caller's
    /// responsibility.
    Matched(MatchInfo),

    /// The output reader terminated before the pattern appeared.
    ///
    /// The child exited and the final drain completed without producing a
    /// match. This is the silent "source is gone" exit, distinct from the
    /// dead-process precondition failure raised at `wait` entry.
    SourceClosed,
}

impl WaitOutcome {
    /// Returns `true` if the pattern matched.
    pub fn is_match(&self) -> bool {
        matches!(self, WaitOutcome::Matched(_))
    }

    /// Returns the match details, if the pattern matched.
    pub fn match_info(&self) -> Option<&MatchInfo> {
        match self {
            WaitOutcome::Matched(info) => Some(info),
            WaitOutcome::SourceClosed => None,
        }
    }
}

/// Details of a pattern match inside the output buffer.
///
/// Positions are byte offsets into the buffer at the time of the match. The
/// buffer itself is untouched by matching; offsets stay valid until the next
/// flush.
#[derive(Debug, Clone)]
pub struct MatchInfo {
    /// Start of the match (byte offset).
    pub start: usize,

    /// End of the match (byte offset, exclusive).
    pub end: usize,

    /// The matched text.
    pub matched: String,

    /// Everything in the buffer before the match — usually the interesting
    /// part when waiting for a prompt.
    pub before: String,

    /// Captured groups, for regex patterns.
    ///
    /// Index 0 is the full match, later indices the capture groups. Empty
    /// for exact and glob patterns.
    pub captures: Vec<String>,
}

/// Outcome of a [`crate::Session::write`] call.
///
/// Writing to an exiting child is an expected race: the liveness check can
/// pass and the pipe still be closed by the time the bytes arrive. That case
/// is reported as [`WriteOutcome::PipeClosed`] rather than an error so
/// callers can log or ignore it without exception-style control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// All bytes were written to the child's input pipe.
    Written(usize),

    /// The child has closed its end of the input pipe; the bytes were
    /// discarded.
    PipeClosed,
}

impl WriteOutcome {
    /// Returns `true` if the bytes reached the pipe.
    pub fn delivered(&self) -> bool {
        matches!(self, WriteOutcome::Written(_))
    }
}
