use std::io::Write;

use color_eyre::Result;

use crate::{
    cmd::pipeline::Pipeline,
    config::Config,
    prompt::{self, PromptStyle},
};

/// Everything the read-eval loop carries from one line to the next.
pub struct State {
    pub prompt: PromptStyle,
    pub last_status: i32,
    pub lines: usize,
}

impl State {
    pub fn new(config: &Config) -> Self {
        Self {
            prompt: PromptStyle::detect(&config.prompt),
            last_status: 0,
            lines: 0,
        }
    }

    pub fn render<W: Write>(&self, stdout: &mut W) -> Result<()> {
        prompt::render(stdout, self.prompt)?;

        Ok(())
    }

    /// Runs one input line. Only errors that leave the interpreter unable to
    /// continue are returned; everything else is reported and recorded in
    /// `last_status`.
    pub fn execute(&mut self, line: &str) -> Result<()> {
        self.lines += 1;

        let pipeline = Pipeline::parse(line);
        if pipeline.is_blank() {
            trace!("blank line");
            return Ok(());
        }

        debug!(line = self.lines, stages = pipeline.len(), "running pipeline");

        match pipeline.execute() {
            Ok(outcome) => {
                self.last_status = outcome.last_code();
                debug!(
                    line = self.lines,
                    status = self.last_status,
                    reaped = outcome.statuses().len(),
                    "pipeline finished"
                );
                Ok(())
            }
            Err(err) if err.is_fatal() => Err(err.into()),
            Err(err) => {
                warn!(%err, "pipeline aborted");
                eprintln!("pipesh: {err}");
                self.last_status = 1;
                Ok(())
            }
        }
    }
}
