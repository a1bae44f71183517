//! Child lifecycle tracking

use std::process::{Child, ExitStatus};
use std::sync::{Arc, OnceLock};
use std::thread;

use tracing::debug;

/// Owns the single blocking wait on the child.
///
/// A dedicated thread blocks on the OS wait-for-exit primitive exactly once
/// per spawned child, unconditionally — whether or not anyone ever queries
/// liveness — so the child can never linger as a zombie. Liveness is derived
/// from whether that wait has completed; once exited it never reverts.
pub(crate) struct Reaper {
    status: Arc<OnceLock<Option<ExitStatus>>>,
    _thread: thread::JoinHandle<()>,
}

impl Reaper {
    pub(crate) fn spawn(mut child: Child) -> Self {
        let status: Arc<OnceLock<Option<ExitStatus>>> = Arc::new(OnceLock::new());
        let slot = Arc::clone(&status);
        let pid = child.id();

        let thread = thread::spawn(move || {
            // wait(2) can only fail here if the child was somehow reaped
            // elsewhere; either way the process is gone.
            let result = child.wait().ok();
            debug!(pid, status = ?result, "reaped child");
            let _ = slot.set(result);
        });

        Self {
            status,
            _thread: thread,
        }
    }

    /// True until the reaper thread has collected the child's exit status.
    pub(crate) fn is_alive(&self) -> bool {
        self.status.get().is_none()
    }

    /// The recorded exit status, once the child has been reaped.
    pub(crate) fn exit_status(&self) -> Option<ExitStatus> {
        self.status.get().copied().flatten()
    }
}
