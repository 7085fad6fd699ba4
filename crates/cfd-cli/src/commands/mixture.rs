//! `cfd mixture`: density of a weighted mixture of univariate components.

use std::fmt::Write as _;

use cfd_dist::{Density, MixtureDensityModel, UnivariateDistribution};
use serde::Serialize;
use tracing::debug;

use super::Context;
use crate::cli::MixtureArgs;
use crate::error::{CliError, Result};
use crate::output::{number, number_list, Render};

#[derive(Debug, Clone, Serialize)]
pub struct MixturePoint {
    pub x: f64,
    pub density: f64,
    /// Posterior component probabilities at `x`.
    pub responsibilities: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MixtureReport {
    pub components: Vec<UnivariateDistribution>,
    pub weights: Vec<f64>,
    pub prior_weight_sum: f64,
    pub points: Vec<MixturePoint>,
}

impl Render for MixtureReport {
    fn render_text(&self, precision: Option<usize>) -> String {
        let mut text = String::new();
        for p in &self.points {
            let _ = writeln!(
                text,
                "{}\t{}\t{}",
                number(p.x, None),
                number(p.density, precision),
                number_list(&p.responsibilities, precision)
            );
        }
        text
    }
}

pub fn build_mixture(args: &MixtureArgs) -> Result<MixtureDensityModel<UnivariateDistribution>> {
    let components = args
        .components
        .iter()
        .map(|spec| spec.build())
        .collect::<Result<Vec<_>>>()?;
    if args.weights.is_empty() {
        return Ok(MixtureDensityModel::new(components)?);
    }
    if args.weights.len() != components.len() {
        return Err(CliError::input(format!(
            "{} components but {} weights; give one --weight per --component",
            components.len(),
            args.weights.len()
        )));
    }
    Ok(MixtureDensityModel::with_weights(components, &args.weights)?)
}

pub fn run(args: &MixtureArgs, ctx: &mut Context<'_>) -> Result<()> {
    let mixture = build_mixture(args)?;
    debug!(
        components = mixture.len(),
        prior_weight_sum = mixture.prior_weight_sum(),
        "built mixture"
    );
    let points = args
        .points
        .iter()
        .map(|&x| MixturePoint {
            x,
            density: mixture.density(&x),
            responsibilities: mixture.responsibilities(&x),
        })
        .collect();
    ctx.emit(&MixtureReport {
        components: mixture.components().to_vec(),
        weights: mixture.weights().to_vec(),
        prior_weight_sum: mixture.prior_weight_sum(),
        points,
    })
}
