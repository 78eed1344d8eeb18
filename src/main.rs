use std::{
    fs,
    io::{self, Write},
};

use color_eyre::Result;
use nix::sys::signal::{signal, SigHandler, Signal};
use pipesh::{
    config::{Config, LogConfig},
    input,
    state::State,
};
use tracing_subscriber::prelude::*;

#[macro_use]
extern crate tracing;

fn init_tracing(log: &LogConfig) -> Result<()> {
    match &log.directory {
        // blocking writer: a background logging thread would make fork unsafe
        Some(dir) => {
            fs::create_dir_all(dir)?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(tracing_appender::rolling::never(dir, &log.file)),
                )
                .with(tracing_subscriber::EnvFilter::from_default_env())
                .with(tracing_error::ErrorLayer::default())
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
                .with(tracing_subscriber::EnvFilter::from_default_env())
                .with(tracing_error::ErrorLayer::default())
                .init();
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;

    init_tracing(&config.log)?;

    color_eyre::install()?;

    trace!(?config, "loaded config");

    // an inherited SIG_IGN would let the kernel reap stages before waitpid does
    unsafe { signal(Signal::SIGCHLD, SigHandler::SigDfl) }?;

    let mut state = State::new(&config);

    let stdin = io::stdin();
    let mut stdin = stdin.lock();
    let mut stdout = io::stdout();

    loop {
        state.render(&mut stdout)?;

        let Some(line) = input::read_line(&mut stdin)? else {
            break;
        };

        state.execute(&line)?;
    }

    if state.prompt.show {
        writeln!(stdout)?;
    }
    stdout.flush()?;

    trace!(status = state.last_status, "end of input");

    std::process::exit(state.last_status)
}
