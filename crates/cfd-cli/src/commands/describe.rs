//! `cfd describe`: parameters, moments and support.

use std::fmt::Write as _;

use cfd_dist::{Family, IntegerDomain, Parameterized, UnivariateDistribution};
use serde::Serialize;

use super::{named_parameters, Context, NamedParameter};
use crate::cli::DistributionArgs;
use crate::error::Result;
use crate::output::{number, number_list, Render};

#[derive(Debug, Clone, Serialize)]
pub struct DescribeReport {
    pub family: Family,
    pub discrete: bool,
    pub parameters: Vec<NamedParameter>,
    /// Parameter vector in codec order.
    pub vector: Vec<f64>,
    pub mean: f64,
    pub variance: f64,
    /// Enumerable support, discrete families only.
    pub domain: Option<IntegerDomain>,
}

impl DescribeReport {
    pub fn new(dist: &UnivariateDistribution) -> Self {
        Self {
            family: dist.family(),
            discrete: dist.family().is_discrete(),
            parameters: named_parameters(dist),
            vector: dist.parameters().into_inner(),
            mean: dist.mean(),
            variance: dist.variance(),
            domain: dist.domain(),
        }
    }
}

impl Render for DescribeReport {
    fn render_text(&self, precision: Option<usize>) -> String {
        let mut text = String::new();
        let _ = writeln!(text, "family: {}", self.family);
        for p in &self.parameters {
            let _ = writeln!(text, "{}: {}", p.name, number(p.value, precision));
        }
        let _ = writeln!(text, "vector: {}", number_list(&self.vector, precision));
        let _ = writeln!(text, "mean: {}", number(self.mean, precision));
        let _ = writeln!(text, "variance: {}", number(self.variance, precision));
        if let Some(domain) = &self.domain {
            let _ = writeln!(text, "domain: {}..={}", domain.first(), domain.last());
        }
        text
    }
}

pub fn run(args: &DistributionArgs, ctx: &mut Context<'_>) -> Result<()> {
    let dist = args.build()?;
    ctx.emit(&DescribeReport::new(&dist))
}
