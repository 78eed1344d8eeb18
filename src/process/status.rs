use nix::sys::{signal::Signal, wait::WaitStatus};

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageExitStatus {
    Exited(i32),
    Signaled(Signal),
}

impl StageExitStatus {
    /// `None` for statuses that do not mean the process is gone.
    pub fn from_wait(status: WaitStatus) -> Option<Self> {
        match status {
            WaitStatus::Exited(_, code) => Some(Self::Exited(code)),
            WaitStatus::Signaled(_, signal, _) => Some(Self::Signaled(signal)),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            Self::Signaled(signal) => 128 + *signal as i32,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }
}

/// A reaped stage process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageStatus {
    pub stage: usize,
    pub pid: Pid,
    pub exit: StageExitStatus,
}

/// Every stage reaped for one input line, in pipeline order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    statuses: Vec<StageStatus>,
}

impl PipelineOutcome {
    pub fn new(statuses: Vec<StageStatus>) -> Self {
        Self { statuses }
    }

    pub fn statuses(&self) -> &[StageStatus] {
        &self.statuses
    }

    /// Exit code of the final stage, which is what the pipeline reports.
    pub fn last_code(&self) -> i32 {
        self.statuses.last().map_or(0, |status| status.exit.code())
    }

    pub fn success(&self) -> bool {
        self.last_code() == 0
    }
}
