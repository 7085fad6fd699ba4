//! `cfd pdf` and `cfd cdf`.

use cfd_dist::{Family, Parameterized};
use serde::Serialize;
use tracing::debug;

use super::Context;
use crate::cli::EvaluateArgs;
use crate::error::Result;
use crate::output::{number, number_list, Render};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    Pdf,
    Cdf,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointValue {
    pub x: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub function: Function,
    pub family: Family,
    pub parameters: Vec<f64>,
    pub points: Vec<PointValue>,
}

impl Render for EvaluationReport {
    fn render_text(&self, precision: Option<usize>) -> String {
        self.points
            .iter()
            .map(|p| format!("{}\t{}\n", number(p.x, None), number(p.value, precision)))
            .collect()
    }
}

pub fn run(function: Function, args: &EvaluateArgs, ctx: &mut Context<'_>) -> Result<()> {
    let dist = args.distribution.build()?;
    let points = args
        .points
        .iter()
        .map(|&x| PointValue {
            x,
            value: match function {
                Function::Pdf => dist.pdf_at(x),
                Function::Cdf => dist.cdf_at(x),
            },
        })
        .collect::<Vec<_>>();
    debug!(
        family = %dist.family(),
        parameters = %number_list(dist.parameters().as_slice(), None),
        points = points.len(),
        "evaluated {:?}",
        function
    );
    ctx.emit(&EvaluationReport {
        function,
        family: dist.family(),
        parameters: dist.parameters().into_inner(),
        points,
    })
}
