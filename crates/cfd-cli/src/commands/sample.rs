//! `cfd sample`: seeded random draws.

use cfd_dist::{Family, Parameterized, Sampler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use super::Context;
use crate::cli::SampleArgs;
use crate::error::{CliError, Result};
use crate::output::{number, Render};

#[derive(Debug, Clone, Serialize)]
pub struct SampleReport {
    pub family: Family,
    pub parameters: Vec<f64>,
    /// Seed that reproduces `samples`.
    pub seed: u64,
    pub samples: Vec<f64>,
}

impl Render for SampleReport {
    fn render_text(&self, precision: Option<usize>) -> String {
        self.samples
            .iter()
            .map(|&v| format!("{}\n", number(v, precision)))
            .collect()
    }
}

pub fn run(args: &SampleArgs, ctx: &mut Context<'_>) -> Result<()> {
    let dist = args.distribution.build()?;
    let count = args.count.unwrap_or(ctx.settings.sampling.count);
    if count == 0 {
        return Err(CliError::input("sample count must be at least 1"));
    }
    let seed = args
        .seed
        .or(ctx.settings.sampling.seed)
        .unwrap_or_else(|| rand::rng().random());

    let mut rng = StdRng::seed_from_u64(seed);
    let samples = dist.sample_n(&mut rng, count)?;
    debug!(family = %dist.family(), count, seed, "drew samples");

    ctx.emit(&SampleReport {
        family: dist.family(),
        parameters: dist.parameters().into_inner(),
        seed,
        samples,
    })
}
