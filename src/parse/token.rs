use std::ffi::{CStr, CString, NulError};

use logos::Logos;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Default, Error)]
pub enum LexerError {
    #[default]
    #[error("unknown token")]
    UnknownToken,
}

/// Words are maximal runs of non-whitespace. There is no quoting, escaping
/// or globbing.
#[derive(Debug, PartialEq, Logos)]
#[logos(skip r"[ \t\n\r\f]+", error = LexerError)]
pub enum Token<'a> {
    #[regex(r"[^ \t\n\r\f]+")]
    Word(&'a str),
}

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("failed to tokenize command: {0}")]
    Lexer(#[from] LexerError),
    #[error("argument contains a NUL byte: {0}")]
    Nul(#[from] NulError),
}

pub fn words(command: &str) -> Result<Vec<&str>, LexerError> {
    Token::lexer(command)
        .map(|token| token.map(|Token::Word(word)| word))
        .collect()
}

/// The argv handed to `execvp`: program name first, then its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentVector(Vec<CString>);

impl ArgumentVector {
    pub fn tokenize(command: &str) -> Result<Self, TokenizeError> {
        let args = words(command)?
            .into_iter()
            .map(CString::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(args))
    }

    pub fn program(&self) -> Option<&CStr> {
        self.0.first().map(CString::as_c_str)
    }

    pub fn as_slice(&self) -> &[CString] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
