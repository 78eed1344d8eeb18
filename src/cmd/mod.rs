use thiserror::Error;

use crate::prelude::*;

pub mod execute;
pub mod pipeline;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to save standard descriptors: {0}")]
    SaveStdio(#[source] Errno),
    #[error("pipe: {0}")]
    Pipe(#[source] Errno),
    #[error("fork failed for stage {stage}: {source}")]
    Fork {
        stage: usize,
        #[source]
        source: Errno,
    },
    #[error("waiting for pid {pid} failed: {source}")]
    Wait {
        pid: Pid,
        #[source]
        source: Errno,
    },
}

impl PipelineError {
    /// A half-built pipe topology cannot be recovered from, so the
    /// interpreter has to stop.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Pipe(_))
    }
}
