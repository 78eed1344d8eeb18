use nix::{
    sys::wait::waitpid,
    unistd::{fork, ForkResult},
};

use super::{pipeline::Pipeline, PipelineError};
use crate::{
    prelude::*,
    process::{
        child::{run_stage, StagePosition},
        pipe::Boundaries,
        status::{PipelineOutcome, StageExitStatus, StageStatus},
        stdio::SavedStdio,
    },
};

impl Pipeline {
    /// Forks one process per stage, wires them together and reaps them all.
    ///
    /// Every stage is forked before any is waited on, so data streams through
    /// the pipes while the whole pipeline runs. Boundary `k` is opened before
    /// stage `k` is forked and closed in this process as soon as stage `k + 1`
    /// exists.
    pub fn execute(&self) -> Result<PipelineOutcome, PipelineError> {
        let count = self.len();
        let saved = SavedStdio::save().map_err(PipelineError::SaveStdio)?;
        let mut boundaries = Boundaries::with_capacity(self.boundaries());
        let mut children = Vec::with_capacity(count);

        if count > 1 {
            boundaries.open(0).map_err(PipelineError::Pipe)?;
        }

        for (index, stage) in self.stages().iter().enumerate() {
            let position = StagePosition { index, count };

            // SAFETY: the child allocates and writes to stderr before exec, so no
            // other thread may hold those locks here. The interpreter never
            // starts a second thread.
            match unsafe { fork() } {
                Ok(ForkResult::Child) => run_stage(stage, position, &mut boundaries, &saved),
                Ok(ForkResult::Parent { child }) => {
                    trace!(stage = index, pid = %child, "forked stage");
                    children.push((index, child));
                }
                Err(source) => {
                    warn!(stage = index, %source, "fork failed, aborting pipeline");
                    boundaries.close_all();
                    reap(&children);
                    return Err(PipelineError::Fork {
                        stage: index,
                        source,
                    });
                }
            }

            // look ahead: boundary index + 1 must exist before stage index + 1 forks
            if index + 2 < count {
                if let Err(source) = boundaries.open(index + 1) {
                    error!(boundary = index + 1, %source, "pipe creation failed");
                    boundaries.close_all();
                    reap(&children);
                    return Err(PipelineError::Pipe(source));
                }
            }

            if index > 0 {
                boundaries.close(index - 1);
            }
        }

        debug_assert!(boundaries.is_empty(), "every boundary closed in the parent");
        drop(saved);

        let mut statuses = Vec::with_capacity(count);
        let mut first_error = None;
        for result in reap(&children) {
            match result {
                Ok(status) => statuses.push(status),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(PipelineOutcome::new(statuses)),
        }
    }
}

/// Waits for every child in pipeline order.
fn reap(children: &[(usize, Pid)]) -> Vec<Result<StageStatus, PipelineError>> {
    children
        .iter()
        .map(|&(stage, pid)| wait_for(stage, pid))
        .collect()
}

fn wait_for(stage: usize, pid: Pid) -> Result<StageStatus, PipelineError> {
    loop {
        match waitpid(pid, None) {
            Ok(status) => {
                if let Some(exit) = StageExitStatus::from_wait(status) {
                    debug!(stage, %pid, code = exit.code(), "stage exited");
                    return Ok(StageStatus { stage, pid, exit });
                }
            }
            Err(Errno::EINTR) => continue,
            Err(source) => return Err(PipelineError::Wait { pid, source }),
        }
    }
}
