//! PTY and pipe plumbing between parent and child

use std::os::fd::{AsRawFd, OwnedFd};
use std::process::{Child, Command, Stdio};

use nix::fcntl::{fcntl, FcntlArg, OFlag};
use nix::pty::{openpty, Winsize};
use nix::unistd::pipe;
use tracing::debug;

use crate::result::DriveError;

/// Parent-side handles left open once the child is wired up.
///
/// The child sees: stdin ← input pipe read end, stdout → pty slave,
/// stderr → error pipe write end. The parent keeps the opposite ends; the
/// child-side ends are closed in the parent when the spawn completes.
pub(crate) struct Transport {
    pub(crate) master: OwnedFd,
    pub(crate) input: OwnedFd,
    pub(crate) err_read: OwnedFd,
    pub(crate) child: Child,
}

/// Characters that hand the command to `/bin/sh -c` instead of a direct
/// exec, mirroring how OS-level spawn mechanisms decide.
const SHELL_METACHARS: &[u8] = b"*?{}[]<>()~&|\\$;'\"`\n#";

/// Allocate the pty pair and both pipes, then spawn `command` with its
/// standard streams bound to the child-side ends.
///
/// A plain command is split on whitespace and exec'd directly, so a missing
/// binary surfaces as a spawn error here rather than inside a shell; a
/// command containing shell metacharacters goes through `/bin/sh -c`.
///
/// Stdin deliberately comes from a plain pipe rather than the pty slave so
/// input bytes bypass the terminal line discipline (no echo, no line
/// editing); stderr gets its own pipe so diagnostics stay separable from
/// terminal output. Only stdout runs through the pty.
pub(crate) fn spawn(command: &str, rows: u16, cols: u16) -> Result<Transport, DriveError> {
    let parts: Vec<&str> = command.split_whitespace().collect();
    if parts.is_empty() {
        return Err(DriveError::Spawn(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "empty command",
        )));
    }

    let winsize = Winsize {
        ws_row: rows,
        ws_col: cols,
        ws_xpixel: 0,
        ws_ypixel: 0,
    };
    let pty = openpty(Some(&winsize), None).map_err(DriveError::Pty)?;

    let (input_read, input_write) = pipe().map_err(DriveError::Pty)?;
    let (err_read, err_write) = pipe().map_err(DriveError::Pty)?;

    // The wait loop polls the master; reads must never block it.
    set_nonblocking(&pty.master)?;

    let mut cmd = if command.bytes().any(|b| SHELL_METACHARS.contains(&b)) {
        let mut c = Command::new("/bin/sh");
        c.arg("-c").arg(command);
        c
    } else {
        let mut c = Command::new(parts[0]);
        c.args(&parts[1..]);
        c
    };
    cmd.stdin(Stdio::from(input_read))
        .stdout(Stdio::from(pty.slave))
        .stderr(Stdio::from(err_write));

    let child = cmd.spawn().map_err(DriveError::Spawn)?;
    debug!(pid = child.id(), command, "spawned child under pty");

    // Dropping the Command closes the parent's copies of the slave, the
    // input read end, and the stderr write end.
    drop(cmd);

    Ok(Transport {
        master: pty.master,
        input: input_write,
        err_read,
        child,
    })
}

pub(crate) fn set_nonblocking(fd: &impl AsRawFd) -> Result<(), DriveError> {
    let flags = fcntl(fd.as_raw_fd(), FcntlArg::F_GETFL).map_err(DriveError::Pty)?;
    let flags = OFlag::from_bits_retain(flags) | OFlag::O_NONBLOCK;
    fcntl(fd.as_raw_fd(), FcntlArg::F_SETFL(flags)).map_err(DriveError::Pty)?;
    Ok(())
}
