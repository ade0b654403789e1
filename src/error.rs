//! Error type shared by all `abt` operations.

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not access `{}`: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed configuration in `{}`: {source}", .path.display())]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not run `{command}`: {source}")]
    ToolchainSpawn {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("`{command}` failed ({status})")]
    ToolchainFailed { command: String, status: ExitStatus },
    #[error("could not list serial ports in `{}`: {source}", .dir.display())]
    PortScan {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Terminal Error: {0}")]
    Terminal(#[from] crossterm::ErrorKind),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
}
