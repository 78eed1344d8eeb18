use std::{
    convert::Infallible,
    io::{self, Write},
};

use thiserror::Error;

use crate::{
    cmd::pipeline::Stage,
    parse::{
        redirect::{self, RedirectError},
        token::{ArgumentVector, TokenizeError},
    },
    prelude::*,
};

use super::{
    launch::{launch, LaunchError},
    pipe::{Boundaries, PipeEndpoint},
    stdio::{dup_onto, SavedStdio},
};

#[derive(Debug, Error)]
pub enum StageError {
    #[error("pipe for boundary {0} is already closed")]
    MissingBoundary(usize),
    #[error("failed to wire descriptor {fd}: {source}")]
    Wire {
        fd: RawFd,
        #[source]
        source: Errno,
    },
    #[error(transparent)]
    Redirect(#[from] RedirectError),
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

impl StageError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Launch(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Where a stage sits in its pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePosition {
    pub index: usize,
    pub count: usize,
}

impl StagePosition {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }
}

/// Body of a freshly forked stage process. Never returns: the process either
/// becomes the requested program or exits.
pub fn run_stage(
    stage: &Stage,
    position: StagePosition,
    boundaries: &mut Boundaries,
    saved: &SavedStdio,
) -> ! {
    let err = match wire_and_launch(stage, position, boundaries, saved) {
        Ok(never) => match never {},
        Err(err) => err,
    };

    warn!(stage = position.index, %err, "stage failed");
    let _ = writeln!(io::stderr(), "pipesh: {err}");

    // SAFETY: skips the interpreter's exit handlers, which belong to the parent
    unsafe { nix::libc::_exit(err.exit_code()) }
}

fn wire_and_launch(
    stage: &Stage,
    position: StagePosition,
    boundaries: &mut Boundaries,
    saved: &SavedStdio,
) -> Result<Infallible, StageError> {
    // previous pipe first, then next pipe or the saved stdout
    if position.is_first() {
        wire(&saved.stdin, STDIN)?;
    } else {
        let boundary = position.index - 1;
        let PipeEndpoint { read, write } = boundaries
            .take(boundary)
            .ok_or(StageError::MissingBoundary(boundary))?;
        drop(write);
        wire(&read, STDIN)?;
    }

    if position.is_last() {
        wire(&saved.stdout, STDOUT)?;
    } else {
        let boundary = position.index;
        let PipeEndpoint { read, write } = boundaries
            .take(boundary)
            .ok_or(StageError::MissingBoundary(boundary))?;
        drop(read);
        wire(&write, STDOUT)?;
    }

    boundaries.close_all();

    // file redirection goes last so it overrides any pipe end wired above
    let (command, redirection) = redirect::resolve(stage.text())?;
    if let Some(redirection) = redirection {
        redirection.apply()?;
    }

    let argv = ArgumentVector::tokenize(command)?;

    Ok(launch(&argv)?)
}

fn wire(source: &impl AsRawFd, fd: RawFd) -> Result<(), StageError> {
    dup_onto(source, fd).map_err(|source| StageError::Wire { fd, source })
}
