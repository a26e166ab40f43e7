//! Errors at the fallible edges: terminal, settings file, log file
//!
//! The simulation itself never fails.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] io::Error),

    #[error("failed to present frame: {0}")]
    Present(#[source] io::Error),

    #[error("failed to read settings file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
