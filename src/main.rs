//! Kitty Play entry point
//!
//! Parses flags, sets up logging, then either runs the terminal animation
//! until a quit key is pressed or simulates a fixed number of ticks headless
//! and prints the final frame.

use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use env_logger::{Env, Target};

use kitty_play::cli::Cli;
use kitty_play::sim::Playground;
use kitty_play::surface::CellBuffer;
use kitty_play::terminal::{self, TerminalSurface};
use kitty_play::{AppError, CancelToken, app};

/// Logs must never land on the animated screen
fn init_logging(cli: &Cli) -> Result<(), AppError> {
    let default_filter = match (&cli.log_file, cli.headless) {
        (Some(_), _) => "info",
        (None, true) => "warn",
        (None, false) => "off",
    };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(path) = &cli.log_file {
        let file = File::create(path).map_err(|source| AppError::LogFile {
            path: path.clone(),
            source,
        })?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn run(cli: &Cli) -> Result<(), AppError> {
    init_logging(cli)?;
    let settings = cli.settings()?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    log::info!("Kitty Play starting (seed {seed})");

    let mut playground = Playground::new(&settings, seed);

    if cli.headless {
        let mut frame = CellBuffer::new(cli.width, cli.height);
        app::run_ticks(&mut frame, &mut playground, cli.ticks)?;
        println!("{frame}");
        return Ok(());
    }

    let cancel = CancelToken::new();
    let mut surface = TerminalSurface::new()?;
    let watcher = terminal::spawn_key_watcher(cancel.clone());
    let result = app::run(&mut surface, &mut playground, &cancel, settings.frame_interval());

    cancel.cancel();
    if watcher.join().is_err() {
        log::warn!("Key watcher thread panicked");
    }
    // Restore the terminal before anything is printed
    drop(surface);
    result.map(|_| ())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("kitty-play: {err}");
            ExitCode::FAILURE
        }
    }
}
