//! Command-line surface of the `cfd` binary.

use std::path::PathBuf;
use std::str::FromStr;

use cfd_dist::{Family, ParameterVector, UnivariateDistribution};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::MAX_PRECISION;
use crate::error::Result;
use crate::logging::{LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "cfd")]
#[command(author, version, about = "Evaluate, sample and fit closed-form probability distributions")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Settings file (overrides CFD_CONFIG and the config directories)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format for command payloads
    #[arg(long, short = 'f', global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Fractional digits in text output (0 to 17)
    #[arg(long, global = true, value_parser = parse_precision)]
    pub precision: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log format on stderr: human or jsonl
    #[arg(long, global = true, value_name = "FORMAT")]
    pub log_format: Option<LogFormat>,
}

fn parse_precision(s: &str) -> std::result::Result<usize, String> {
    let digits: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number of digits"))?;
    if digits > MAX_PRECISION {
        return Err(format!("must be at most {MAX_PRECISION}"));
    }
    Ok(digits)
}

impl GlobalOpts {
    pub fn log_level(&self) -> Option<LogLevel> {
        LogLevel::from_verbosity(self.verbose, self.quiet)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Density (or mass) at each point
    Pdf(EvaluateArgs),

    /// Cumulative probability at each point
    Cdf(EvaluateArgs),

    /// Parameters, moments and support of a distribution
    Describe(DistributionArgs),

    /// Draw random samples
    Sample(SampleArgs),

    /// Maximum-likelihood fit from samples
    Fit(FitArgs),

    /// Density of a weighted mixture of univariate components
    Mixture(MixtureArgs),

    /// List supported families and their parameters
    Families,
}

/// A family plus its parameter vector.
#[derive(Args, Debug, Clone)]
pub struct DistributionArgs {
    /// Distribution family (chi_square, negative_binomial, pareto, poisson, uniform)
    pub family: Family,

    /// Comma-separated parameter vector; family defaults when omitted
    #[arg(
        long,
        short = 'p',
        value_delimiter = ',',
        allow_hyphen_values = true,
        value_name = "A,B,.."
    )]
    pub params: Vec<f64>,
}

impl DistributionArgs {
    pub fn build(&self) -> Result<UnivariateDistribution> {
        build_distribution(self.family, &self.params)
    }
}

fn build_distribution(family: Family, params: &[f64]) -> Result<UnivariateDistribution> {
    if params.is_empty() {
        return Ok(UnivariateDistribution::default_for(family));
    }
    let vector = ParameterVector::from(params);
    Ok(UnivariateDistribution::from_parameters(family, &vector)?)
}

#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub distribution: DistributionArgs,

    /// Points to evaluate
    #[arg(required = true, allow_negative_numbers = true)]
    pub points: Vec<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct SampleArgs {
    #[command(flatten)]
    pub distribution: DistributionArgs,

    /// Number of draws (default from settings)
    #[arg(long, short = 'n')]
    pub count: Option<usize>,

    /// RNG seed (default from settings, else random and reported)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct FitArgs {
    /// Distribution family to fit
    pub family: Family,

    /// Sample file, whitespace or comma separated; `-` or absent reads stdin
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Per-sample weights file in the same format as the samples
    #[arg(long, value_name = "PATH")]
    pub weights: Option<PathBuf>,

    /// Known Pareto shift (location); only the shape and scale are fitted
    #[arg(long, allow_negative_numbers = true)]
    pub shift: Option<f64>,

    /// Override the solver iteration cap
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Override the solver tolerance
    #[arg(long)]
    pub tolerance: Option<f64>,
}

#[derive(Args, Debug, Clone)]
pub struct MixtureArgs {
    /// Component as `family[:a,b,..]`; repeat for each component
    #[arg(long = "component", short = 'c', required = true, value_name = "FAMILY:PARAMS")]
    pub components: Vec<ComponentSpec>,

    /// Prior weight per component, in order; all 1 when omitted
    #[arg(long = "weight", short = 'w', value_name = "W")]
    pub weights: Vec<f64>,

    /// Points to evaluate
    #[arg(required = true, allow_negative_numbers = true)]
    pub points: Vec<f64>,
}

/// A mixture component given on the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSpec {
    pub family: Family,
    pub params: Vec<f64>,
}

impl ComponentSpec {
    pub fn build(&self) -> Result<UnivariateDistribution> {
        build_distribution(self.family, &self.params)
    }
}

impl FromStr for ComponentSpec {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (family, params) = match s.split_once(':') {
            Some((family, params)) => (family, params),
            None => (s, ""),
        };
        let family = family.parse::<Family>()?;
        let params = params
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| {
                p.parse::<f64>()
                    .map_err(|e| format!("invalid parameter '{p}' in component '{s}': {e}"))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ComponentSpec { family, params })
    }
}
