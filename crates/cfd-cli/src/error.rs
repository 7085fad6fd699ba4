//! Top-level error type for the command-line front end.

use std::path::PathBuf;

use cfd_dist::DistError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::exit_codes::ExitCode;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Distribution(#[from] DistError),

    /// Malformed user input that clap could not reject up front.
    #[error("invalid input: {0}")]
    Input(String),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        CliError::Input(message.into())
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Config(_) => ExitCode::ConfigError,
            CliError::Distribution(err) => match err {
                DistError::InvalidSample(_) | DistError::Estimation(_) => ExitCode::EstimationError,
                DistError::Sampling(_) => ExitCode::InternalError,
                _ => ExitCode::ParameterError,
            },
            CliError::Input(_) => ExitCode::ArgsError,
            CliError::Read { .. } | CliError::Write(_) => ExitCode::IoError,
            CliError::Encode(_) => ExitCode::InternalError,
        }
    }
}
