//! `cfd`: evaluate, sample and fit closed-form distributions.

use cfd_cli::{init_logging, Cli, ExitCode, LogConfig};
use clap::Parser;
use tracing::debug;

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig::from_env(cli.global.log_level(), cli.global.log_format);
    init_logging(&log_config);

    let exit_code = match cfd_cli::run(&cli) {
        Ok(()) => ExitCode::Ok,
        Err(err) => {
            let code = err.exit_code();
            debug!(code = code.code_name(), "command failed");
            eprintln!("error: {err}");
            code
        }
    };

    std::process::exit(exit_code.as_i32());
}
