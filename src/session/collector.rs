//! Non-blocking output accumulation

use std::os::fd::{AsRawFd, OwnedFd};
use std::sync::Arc;

use nix::errno::Errno;
use nix::unistd::read;
use tracing::{debug, trace};

use crate::buffer::OutputBuffer;
use crate::result::DriveError;

/// What a single resumption of the collector accomplished.
///
/// "Read nothing because no data yet" is an explicit variant, not an error:
/// absence of data means try again later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadStep {
    /// One non-blocking read succeeded and `n` bytes were appended.
    Appended(usize),
    /// No data available this cycle (or a transient read failure, absorbed).
    NothingYet,
    /// Process exit was observed: the final drain appended `n` bytes total
    /// and the collector is now permanently terminated.
    Drained(usize),
}

/// Resumable read task over the pty master.
///
/// An explicit state object driven synchronously by whoever runs the wait
/// loop: each `resume` performs at most one read attempt while the child
/// runs, so a single logical operation is in flight at any time and bytes
/// land in the buffer in read order. The first resumption that observes the
/// child's exit performs one unbounded drain and then the collector can
/// never be resumed again.
pub(crate) struct Collector {
    master: Arc<OwnedFd>,
    default_chunk: usize,
    terminated: bool,
}

impl Collector {
    pub(crate) fn new(master: Arc<OwnedFd>, default_chunk: usize) -> Self {
        Self {
            master,
            default_chunk,
            terminated: false,
        }
    }

    pub(crate) fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Drive one step of the read task.
    ///
    /// `alive` is the liveness sampled at the start of this resumption;
    /// `chunk` overrides the default read size for this attempt only.
    ///
    /// # Errors
    ///
    /// [`DriveError::ReaderTerminated`] once the final drain has run.
    pub(crate) fn resume(
        &mut self,
        buffer: &mut OutputBuffer,
        alive: bool,
        chunk: Option<usize>,
    ) -> Result<ReadStep, DriveError> {
        if self.terminated {
            return Err(DriveError::ReaderTerminated);
        }

        let want = chunk.unwrap_or(self.default_chunk).max(1);
        let mut scratch = vec![0u8; want];

        if alive {
            match read(self.master.as_raw_fd(), &mut scratch) {
                Ok(0) => Ok(ReadStep::NothingYet),
                Ok(n) => {
                    buffer.append(&scratch[..n]);
                    trace!(bytes = n, "appended pty output");
                    Ok(ReadStep::Appended(n))
                }
                Err(Errno::EAGAIN) => Ok(ReadStep::NothingYet),
                // Transient read failures are absorbed; the wait loop will
                // observe process death on a later resumption.
                Err(_) => Ok(ReadStep::NothingYet),
            }
        } else {
            // Exit observed: flush whatever is left in the pty one last time.
            let mut total = 0;
            loop {
                match read(self.master.as_raw_fd(), &mut scratch) {
                    Ok(0) => break,
                    Ok(n) => {
                        buffer.append(&scratch[..n]);
                        total += n;
                    }
                    Err(Errno::EINTR) => continue,
                    // EAGAIN or EIO: nothing left to read.
                    Err(_) => break,
                }
            }
            self.terminated = true;
            debug!(bytes = total, "output reader terminated after final drain");
            Ok(ReadStep::Drained(total))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::transport::set_nonblocking;
    use nix::unistd::{pipe, write};
    use std::os::fd::OwnedFd;

    fn rig(default_chunk: usize) -> (Collector, OutputBuffer, OwnedFd) {
        let (read_end, write_end) = pipe().unwrap();
        set_nonblocking(&read_end).unwrap();
        (
            Collector::new(Arc::new(read_end), default_chunk),
            OutputBuffer::new(),
            write_end,
        )
    }

    #[test]
    fn empty_source_yields_nothing() {
        let (mut collector, mut buffer, _w) = rig(1000);
        let step = collector.resume(&mut buffer, true, None).unwrap();
        assert_eq!(step, ReadStep::NothingYet);
        assert!(buffer.is_empty());
        assert!(!collector.is_terminated());
    }

    #[test]
    fn chunked_resumptions_preserve_byte_order() {
        let (mut collector, mut buffer, w) = rig(1000);
        write(&w, b"abcdef").unwrap();

        for _ in 0..3 {
            let step = collector.resume(&mut buffer, true, Some(2)).unwrap();
            assert_eq!(step, ReadStep::Appended(2));
        }
        assert_eq!(buffer.as_bytes(), b"abcdef");
    }

    #[test]
    fn chunk_size_one_loses_nothing() {
        let (mut collector, mut buffer, w) = rig(1000);
        write(&w, b"xyz").unwrap();

        for _ in 0..3 {
            collector.resume(&mut buffer, true, Some(1)).unwrap();
        }
        assert_eq!(buffer.as_bytes(), b"xyz");
    }

    #[test]
    fn default_chunk_reads_everything_available() {
        let (mut collector, mut buffer, w) = rig(1000);
        write(&w, b"hello world").unwrap();

        let step = collector.resume(&mut buffer, true, None).unwrap();
        assert_eq!(step, ReadStep::Appended(11));
        assert_eq!(buffer.as_bytes(), b"hello world");
    }

    #[test]
    fn final_drain_collects_remainder_then_terminates() {
        let (mut collector, mut buffer, w) = rig(4);
        write(&w, b"leftover output").unwrap();

        let step = collector.resume(&mut buffer, false, None).unwrap();
        assert_eq!(step, ReadStep::Drained(15));
        assert_eq!(buffer.as_bytes(), b"leftover output");
        assert!(collector.is_terminated());

        assert!(matches!(
            collector.resume(&mut buffer, false, None),
            Err(DriveError::ReaderTerminated)
        ));
        assert!(matches!(
            collector.resume(&mut buffer, true, None),
            Err(DriveError::ReaderTerminated)
        ));
    }

    #[test]
    fn drain_on_empty_source_still_terminates() {
        let (mut collector, mut buffer, _w) = rig(1000);
        let step = collector.resume(&mut buffer, false, None).unwrap();
        assert_eq!(step, ReadStep::Drained(0));
        assert!(collector.is_terminated());
        assert!(buffer.is_empty());
    }

    #[test]
    fn eof_while_running_is_absorbed() {
        let (mut collector, mut buffer, w) = rig(1000);
        drop(w);
        let step = collector.resume(&mut buffer, true, None).unwrap();
        assert_eq!(step, ReadStep::NothingYet);
        assert!(!collector.is_terminated());
    }
}
