//! `cfd fit`: maximum-likelihood estimation from a sample file.

use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};

use cfd_dist::{
    estimate_family, Density, Family, FitConfig, MaximumLikelihood, Parameterized,
    ParetoEstimator, UnivariateDistribution, WeightedSamples,
};
use serde::Serialize;
use tracing::{debug, info};

use super::{named_parameters, Context, NamedParameter};
use crate::cli::FitArgs;
use crate::error::{CliError, Result};
use crate::output::{number, number_list, Render};

#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub family: Family,
    pub parameters: Vec<NamedParameter>,
    pub vector: Vec<f64>,
    /// Number of samples read.
    pub samples: usize,
    pub total_weight: f64,
    /// Weighted log-likelihood of the samples under the fit.
    pub log_likelihood: f64,
    pub mean: f64,
    pub variance: f64,
}

impl Render for FitReport {
    fn render_text(&self, precision: Option<usize>) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "family: {}", self.family);
        for p in &self.parameters {
            let _ = writeln!(text, "{}: {}", p.name, number(p.value, precision));
        }
        let _ = writeln!(text, "vector: {}", number_list(&self.vector, precision));
        let _ = writeln!(text, "samples: {}", self.samples);
        let _ = writeln!(
            text,
            "log_likelihood: {}",
            number(self.log_likelihood, precision)
        );
        text
    }
}

/// Parse whitespace- or comma-separated numbers. `#` starts a comment.
pub fn parse_numbers(text: &str, origin: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default();
        for token in content
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
        {
            let value = token.parse::<f64>().map_err(|_| {
                CliError::input(format!(
                    "{origin}:{}: invalid number '{token}'",
                    index + 1
                ))
            })?;
            values.push(value);
        }
    }
    Ok(values)
}

fn is_stdin(path: Option<&Path>) -> bool {
    path.is_none_or(|p| p.as_os_str() == "-")
}

fn read_source(path: Option<&Path>, ctx: &mut Context<'_>) -> Result<(String, String)> {
    match path {
        Some(p) if !is_stdin(Some(p)) => {
            let text = std::fs::read_to_string(p).map_err(|source| CliError::Read {
                path: p.to_path_buf(),
                source,
            })?;
            Ok((text, p.display().to_string()))
        }
        _ => {
            let mut text = String::new();
            ctx.input
                .read_to_string(&mut text)
                .map_err(|source| CliError::Read {
                    path: PathBuf::from("-"),
                    source,
                })?;
            Ok((text, "<stdin>".to_string()))
        }
    }
}

fn fit_config(args: &FitArgs, base: FitConfig) -> Result<FitConfig> {
    let mut config = base;
    if let Some(max_iterations) = args.max_iterations {
        if max_iterations == 0 {
            return Err(CliError::input("--max-iterations must be at least 1"));
        }
        config.max_iterations = max_iterations;
    }
    if let Some(tolerance) = args.tolerance {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(CliError::input(format!(
                "--tolerance must be finite and > 0, got {tolerance}"
            )));
        }
        config.tolerance = tolerance;
    }
    Ok(config)
}

/// Weighted log-likelihood of `samples` under `dist`.
pub fn log_likelihood(dist: &UnivariateDistribution, samples: &WeightedSamples) -> f64 {
    samples
        .iter()
        .map(|(x, w)| w * dist.log_density(&x))
        .sum()
}

pub fn run(args: &FitArgs, ctx: &mut Context<'_>) -> Result<()> {
    if args.shift.is_some() && args.family != Family::Pareto {
        return Err(CliError::input("--shift only applies to the pareto family"));
    }
    if is_stdin(args.file.as_deref()) && args.weights.is_some() && is_stdin(args.weights.as_deref())
    {
        return Err(CliError::input("samples and weights cannot both come from stdin"));
    }
    let config = fit_config(args, ctx.settings.fit)?;

    let (text, origin) = read_source(args.file.as_deref(), ctx)?;
    let values = parse_numbers(&text, &origin)?;
    let samples = match &args.weights {
        Some(path) => {
            let (text, origin) = read_source(Some(path), ctx)?;
            let weights = parse_numbers(&text, &origin)?;
            WeightedSamples::new(values, weights)?
        }
        None => WeightedSamples::unweighted(&values)?,
    };
    debug!(
        family = %args.family,
        samples = samples.len(),
        total_weight = samples.total_weight(),
        "fitting"
    );

    let fitted: UnivariateDistribution = match args.shift {
        Some(shift) => ParetoEstimator::with_shift(shift)
            .fit_weighted(&samples)?
            .into(),
        None => estimate_family(args.family, &samples, config)?,
    };
    let log_likelihood = log_likelihood(&fitted, &samples);
    info!(
        family = %fitted.family(),
        parameters = %number_list(fitted.parameters().as_slice(), None),
        log_likelihood,
        "fit complete"
    );

    ctx.emit(&FitReport {
        family: fitted.family(),
        parameters: named_parameters(&fitted),
        vector: fitted.parameters().into_inner(),
        samples: samples.len(),
        total_weight: samples.total_weight(),
        log_likelihood,
        mean: fitted.mean(),
        variance: fitted.variance(),
    })
}
