use std::{
    env,
    io::{self, Write},
};

use nix::unistd::{geteuid, gethostname, getuid, User};
use termion::{color, style};

use crate::config::{PromptConfig, PromptMode};

/// Whether to draw a prompt at all, and in colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptStyle {
    pub show: bool,
    pub color: bool,
}

impl PromptStyle {
    pub fn detect(config: &PromptConfig) -> Self {
        let show = match config.show {
            PromptMode::Auto => termion::is_tty(&io::stdin()),
            PromptMode::Always => true,
            PromptMode::Never => false,
        };

        Self {
            show,
            color: config.color && termion::is_tty(&io::stdout()),
        }
    }
}

/// `user@host:cwd$ `, or `#` for root.
pub fn render<W: Write>(out: &mut W, prompt: PromptStyle) -> io::Result<()> {
    if !prompt.show {
        return Ok(());
    }

    let user = User::from_uid(getuid())
        .ok()
        .flatten()
        .map(|user| user.name)
        .unwrap_or_else(|| "?".into());
    let host = gethostname()
        .map(|host| host.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "?".into());
    let cwd = env::current_dir()
        .map(|cwd| cwd.display().to_string())
        .unwrap_or_else(|_| "?".into());
    let indicator = if geteuid().is_root() { '#' } else { '$' };

    if prompt.color {
        write!(
            out,
            "{}{}{user}@{host}{}:{}{cwd}{}{indicator} ",
            style::Bold,
            color::Fg(color::Green),
            color::Fg(color::Reset),
            color::Fg(color::Blue),
            style::Reset,
        )?;
    } else {
        write!(out, "{user}@{host}:{cwd}{indicator} ")?;
    }

    out.flush()
}
