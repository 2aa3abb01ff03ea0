// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod config;
mod error;
mod frame;
mod lifecycle;
mod palette;
mod rain;
mod render;
mod runtime;
mod saver;
mod terminal;

use std::io::IsTerminal;
use std::process::ExitCode;

#[cfg(unix)]
use std::thread;

use clap::Parser;

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{Args, Settings};
use crate::error::Result;
use crate::runtime::Mode;
use crate::terminal::restore_terminal_best_effort;

fn install_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            log::warn!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

/// Size of the attached terminal, if stdout is one.
fn attached_size() -> Option<(u16, u16)> {
    if !std::io::stdout().is_terminal() {
        return None;
    }
    crossterm::terminal::size().ok()
}

fn dispatch(settings: Settings) -> Result<()> {
    match settings.mode {
        Mode::Config => {
            print!("{}", saver::describe(&settings, attached_size())?);
            Ok(())
        }
        Mode::Preview => {
            print!("{}", saver::preview(&settings, attached_size())?);
            Ok(())
        }
        Mode::Run => saver::run(settings),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    install_handlers();

    let args = Args::parse();
    let res = Settings::from_args(&args).and_then(dispatch);

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
