//! Command-line front end for `cfd-dist`.
//!
//! The binary is a thin wrapper: [`run`] resolves settings, then
//! [`execute`] dispatches the parsed command against explicit stdin/stdout
//! handles so commands can be driven in-process.

use std::io::{Read, Write};

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod output;

pub use cli::{Cli, Commands, GlobalOpts};
pub use config::{ConfigError, ConfigLocator, ConfigSource, LoadedSettings, Settings};
pub use error::{CliError, Result};
pub use exit_codes::ExitCode;
pub use logging::{init_logging, LogConfig, LogFormat, LogLevel};
pub use output::OutputFormat;

/// Resolve settings and run `cli` against the process's stdin and stdout.
pub fn run(cli: &Cli) -> Result<()> {
    let loaded = ConfigLocator::from_env(cli.global.config.as_deref()).load()?;
    tracing::debug!(source = %loaded.source, "settings resolved");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    execute(cli, &loaded.settings, &mut stdin.lock(), &mut stdout.lock())
}

/// Run `cli` with explicit settings and I/O handles.
pub fn execute(
    cli: &Cli,
    settings: &Settings,
    input: &mut dyn Read,
    out: &mut dyn Write,
) -> Result<()> {
    let mut ctx = commands::Context::new(&cli.global, settings, input, out);
    commands::dispatch(cli, &mut ctx)
}
