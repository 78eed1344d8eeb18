use std::convert::Infallible;

use nix::{
    sys::signal::{signal, SigHandler, Signal},
    unistd::execvp,
};
use thiserror::Error;

use crate::{parse::token::ArgumentVector, prelude::*};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("empty command")]
    EmptyCommand,
    #[error("failed to reset SIGPIPE: {0}")]
    Signal(#[source] Errno),
    #[error("{program}: {}", describe(.source))]
    Exec {
        program: String,
        #[source]
        source: Errno,
    },
}

fn describe(errno: &Errno) -> &'static str {
    match *errno {
        Errno::ENOENT => "command not found",
        errno => errno.desc(),
    }
}

impl LaunchError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exec {
                source: Errno::ENOENT,
                ..
            } => 127,
            Self::Exec { .. } => 126,
            Self::EmptyCommand | Self::Signal(_) => 1,
        }
    }
}

/// Replaces the current process image with `argv[0]`, searched on `PATH`.
///
/// Only ever returns on failure. The caller is a stage process and must exit
/// with [`LaunchError::exit_code`] rather than carry on.
pub fn launch(argv: &ArgumentVector) -> Result<Infallible, LaunchError> {
    let program = argv.program().ok_or(LaunchError::EmptyCommand)?;

    // the interpreter ignores SIGPIPE and an ignored disposition survives exec
    unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) }.map_err(LaunchError::Signal)?;

    trace!(?argv, "exec");

    execvp(program, argv.as_slice()).map_err(|source| LaunchError::Exec {
        program: program.to_string_lossy().into_owned(),
        source,
    })
}
