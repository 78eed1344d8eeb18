use std::{fs::OpenOptions, os::unix::fs::OpenOptionsExt};

use nix::{
    fcntl::{fcntl, FcntlArg},
    unistd::dup2,
};

use crate::{
    parse::redirect::{RedirectError, RedirectKind, Redirection},
    prelude::*,
};

/// Permission bits for files created by `>`, before the umask applies.
pub const CREATE_MODE: u32 = 0o666;

/// Copies of the interpreter's standard input and output, taken before any
/// pipe exists so a stage can be pointed back at the terminal.
#[derive(Debug)]
pub struct SavedStdio {
    pub stdin: OwnedFd,
    pub stdout: OwnedFd,
}

impl SavedStdio {
    pub fn save() -> Result<Self, Errno> {
        Ok(Self {
            stdin: dup_cloexec(STDIN)?,
            stdout: dup_cloexec(STDOUT)?,
        })
    }
}

fn dup_cloexec(fd: RawFd) -> Result<OwnedFd, Errno> {
    let copy = fcntl(fd, FcntlArg::F_DUPFD_CLOEXEC(0))?;

    // SAFETY: fcntl returned a fresh descriptor that nothing else owns
    Ok(unsafe { OwnedFd::from_raw_fd(copy) })
}

pub fn dup_onto(source: &impl AsRawFd, target: RawFd) -> Result<(), Errno> {
    dup2(source.as_raw_fd(), target)?;
    Ok(())
}

impl Redirection {
    /// Opens the target and puts it on stdin or stdout of the calling
    /// process, replacing whatever was there, pipe ends included.
    pub fn apply(&self) -> Result<(), RedirectError> {
        let mut options = OpenOptions::new();
        match self.kind {
            RedirectKind::Input => options.read(true),
            RedirectKind::Output => options.write(true).create(true).truncate(true),
        };
        options.mode(CREATE_MODE);

        let file = options
            .open(&self.target)
            .map_err(|source| RedirectError::Open {
                path: self.target.clone(),
                source,
            })?;

        let fd = self.kind.descriptor();
        trace!(kind = %self.kind, path = %self.target, fd, "redirecting");

        dup_onto(&file, fd).map_err(|source| RedirectError::Duplicate { fd, source })
    }
}
