//! Error types.
//!
//! [`ExecError`] covers running a command pipeline once. [`Error`] is what
//! the engine hands back to the binary when the whole program has to stop.

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Failure of a single pipeline execution.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The pipeline has no stages.
    #[error("empty command pipeline")]
    Empty,

    /// A stage could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Program of the failing stage.
        program: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The final stage's output could not be read.
    #[error("failed to read output of `{program}`: {source}")]
    Capture {
        /// Program of the final stage.
        program: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Waiting on a stage failed.
    #[error("failed to wait for `{program}`: {source}")]
    Wait {
        /// Program of the stage.
        program: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A stage exited unsuccessfully.
    #[error("`{program}` exited with {status}")]
    Status {
        /// Program of the stage.
        program: String,
        /// Its exit status.
        status: ExitStatus,
    },
}

/// Fatal errors that end the program.
#[derive(Debug, Error)]
pub enum Error {
    /// The command failed and force mode was off.
    #[error("command failed")]
    Execution {
        /// Output captured before the failure (possibly empty).
        output: String,
        /// Why the command failed.
        #[source]
        source: ExecError,
    },

    /// Terminal I/O failed (size query, mode change, write).
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Standard input closed or failed while keybindings were active.
    #[error("input stream closed: {0}")]
    InputClosed(String),

    /// A worker thread panicked.
    #[error("{0} thread panicked")]
    ThreadPanicked(&'static str),
}

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
