#[macro_use]
extern crate tracing;

pub mod cmd;
pub mod config;
pub mod input;
pub mod parse;
pub mod prelude;
pub mod process;
pub mod prompt;
pub mod state;

pub use cmd::{
    pipeline::{Pipeline, Stage},
    PipelineError,
};
pub use process::status::{PipelineOutcome, StageExitStatus, StageStatus};
