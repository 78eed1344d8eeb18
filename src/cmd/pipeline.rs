use std::{convert::Infallible, str::FromStr};

use crate::parse::parse_line;

/// An ordered, non-empty list of stages parsed from one input line.
///
/// Boundary `k` sits between stage `k` (the writer) and stage `k + 1` (the
/// reader), so a pipeline of `n` stages always has `n - 1` boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn parse(line: &str) -> Self {
        parse_line(line)
    }

    pub(crate) fn from_stages(stages: Vec<Stage>) -> Self {
        debug_assert!(!stages.is_empty(), "a pipeline always has a stage");
        Self { stages }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn boundaries(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }

    /// A single stage holding nothing but whitespace. Running it is a no-op.
    pub fn is_blank(&self) -> bool {
        matches!(self.stages.as_slice(), [only] if only.is_blank())
    }
}

impl FromStr for Pipeline {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// The raw text of one command between pipe characters.
///
/// Redirection and argument splitting happen later, inside the stage's own
/// process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    text: String,
}

impl Stage {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
