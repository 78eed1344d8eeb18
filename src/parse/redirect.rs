use std::io;

use strum::Display;
use thiserror::Error;

use super::token::{words, LexerError};
use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RedirectKind {
    #[strum(serialize = "<")]
    Input,
    #[strum(serialize = ">")]
    Output,
}

impl RedirectKind {
    /// The standard descriptor this redirection replaces.
    pub fn descriptor(self) -> RawFd {
        match self {
            Self::Input => STDIN,
            Self::Output => STDOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirection {
    pub kind: RedirectKind,
    pub target: String,
}

#[derive(Debug, Error)]
pub enum RedirectError {
    #[error("syntax error: missing file name after `{0}`")]
    MissingTarget(RedirectKind),
    #[error("failed to tokenize redirection: {0}")]
    Lexer(#[from] LexerError),
    #[error("{path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to redirect descriptor {fd}: {source}")]
    Duplicate {
        fd: RawFd,
        #[source]
        source: Errno,
    },
}

/// Separates a stage's command text from its redirection.
///
/// The last `<` wins; only when there is none is the last `>` considered, so
/// a stage carries at most one redirection. The target is the first word
/// after the operator, split the same way as arguments, and anything
/// following it is dropped.
pub fn resolve(text: &str) -> Result<(&str, Option<Redirection>), RedirectError> {
    let (pos, kind) = match text.rfind('<') {
        Some(pos) => (pos, RedirectKind::Input),
        None => match text.rfind('>') {
            Some(pos) => (pos, RedirectKind::Output),
            None => return Ok((text, None)),
        },
    };

    let (command, rest) = (&text[..pos], &text[pos + 1..]);
    let (target, ignored) = match words(rest)?.split_first() {
        Some((target, ignored)) => (target.to_string(), ignored.to_vec()),
        None => return Err(RedirectError::MissingTarget(kind)),
    };

    if !ignored.is_empty() {
        warn!(%kind, path = %target, ?ignored, "ignoring words after redirection target");
    }

    Ok((command, Some(Redirection { kind, target })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_operator_leaves_text_untouched() {
        let (command, redirection) = resolve(" sort -r ").unwrap();
        assert_eq!(command, " sort -r ");
        assert_eq!(redirection, None);
    }

    #[test]
    fn output_redirection() {
        let (command, redirection) = resolve("echo hi > out.txt ").unwrap();
        assert_eq!(command, "echo hi ");
        assert_eq!(
            redirection,
            Some(Redirection {
                kind: RedirectKind::Output,
                target: "out.txt".into()
            })
        );
        assert_eq!(RedirectKind::Output.descriptor(), STDOUT);
    }

    #[test]
    fn input_redirection_without_spaces() {
        let (command, redirection) = resolve("cat<file ").unwrap();
        assert_eq!(command, "cat");
        let redirection = redirection.unwrap();
        assert_eq!(redirection.kind, RedirectKind::Input);
        assert_eq!(redirection.target, "file");
        assert_eq!(redirection.kind.descriptor(), STDIN);
    }

    #[test]
    fn input_is_checked_before_output() {
        let (command, redirection) = resolve("sort > out.txt < in.txt ").unwrap();
        assert_eq!(command, "sort > out.txt ");
        assert_eq!(redirection.unwrap().kind, RedirectKind::Input);
    }

    #[test]
    fn last_operator_wins() {
        let (command, redirection) = resolve("cat < a < b").unwrap();
        assert_eq!(command, "cat < a ");
        assert_eq!(redirection.unwrap().target, "b");
    }

    #[test]
    fn words_after_target_are_dropped() {
        let (command, redirection) = resolve("sort > out.txt -r ").unwrap();
        assert_eq!(command, "sort ");
        assert_eq!(redirection.unwrap().target, "out.txt");
    }

    #[test]
    fn target_splits_like_arguments() {
        // no-break space and vertical tab are not separators for either
        let (_, redirection) = resolve("cat < a\u{a0}b\u{b} c").unwrap();
        let target = redirection.unwrap().target;
        assert_eq!(target, "a\u{a0}b\u{b}");
        assert_eq!(words(&target).unwrap(), vec![target.as_str()]);

        let (_, redirection) = resolve("sort >\tout.txt\r\n").unwrap();
        assert_eq!(redirection.unwrap().target, "out.txt");
    }

    #[test]
    fn operator_without_target_is_an_error() {
        assert!(matches!(
            resolve("cat <  "),
            Err(RedirectError::MissingTarget(RedirectKind::Input))
        ));
        assert_eq!(
            resolve("echo >").unwrap_err().to_string(),
            "syntax error: missing file name after `>`"
        );
    }
}
