//! Subcommand implementations.
//!
//! Each command builds a report and hands it to [`Context::emit`].

use std::io::{Read, Write};

use cfd_dist::{Parameterized, UnivariateDistribution};
use serde::Serialize;

use crate::cli::{Cli, Commands, GlobalOpts};
use crate::config::Settings;
use crate::error::Result;
use crate::output::{emit, OutputFormat, Render};

pub mod describe;
pub mod evaluate;
pub mod families;
pub mod fit;
pub mod mixture;
pub mod sample;

/// Per-invocation state shared by the commands.
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub format: OutputFormat,
    pub precision: Option<usize>,
    pub input: &'a mut dyn Read,
    pub out: &'a mut dyn Write,
}

impl<'a> Context<'a> {
    /// CLI flags win over settings.
    pub fn new(
        global: &GlobalOpts,
        settings: &'a Settings,
        input: &'a mut dyn Read,
        out: &'a mut dyn Write,
    ) -> Self {
        Self {
            settings,
            format: global.format.unwrap_or(settings.output.format),
            precision: global.precision.or(settings.output.precision),
            input,
            out,
        }
    }

    pub fn emit<R: Render>(&mut self, report: &R) -> Result<()> {
        emit(&mut *self.out, self.format, self.precision, report)
    }
}

/// One named entry of a parameter vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NamedParameter {
    pub name: &'static str,
    pub value: f64,
}

pub fn named_parameters(dist: &UnivariateDistribution) -> Vec<NamedParameter> {
    dist.family()
        .parameter_names()
        .iter()
        .zip(dist.parameters().as_slice())
        .map(|(&name, &value)| NamedParameter { name, value })
        .collect()
}

/// Dispatch the parsed command.
pub fn dispatch(cli: &Cli, ctx: &mut Context<'_>) -> Result<()> {
    match &cli.command {
        Commands::Pdf(args) => evaluate::run(evaluate::Function::Pdf, args, ctx),
        Commands::Cdf(args) => evaluate::run(evaluate::Function::Cdf, args, ctx),
        Commands::Describe(args) => describe::run(args, ctx),
        Commands::Sample(args) => sample::run(args, ctx),
        Commands::Fit(args) => fit::run(args, ctx),
        Commands::Mixture(args) => mixture::run(args, ctx),
        Commands::Families => families::run(ctx),
    }
}
