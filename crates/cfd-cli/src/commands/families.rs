//! `cfd families`: the supported families and their parameter vectors.

use std::fmt::Write as _;

use cfd_dist::{Family, Parameterized, UnivariateDistribution};
use serde::Serialize;

use super::Context;
use crate::error::Result;
use crate::output::{number_list, Render};

#[derive(Debug, Clone, Serialize)]
pub struct FamilyInfo {
    pub family: Family,
    pub discrete: bool,
    pub parameters: &'static [&'static str],
    pub defaults: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamiliesReport {
    pub families: Vec<FamilyInfo>,
}

impl Render for FamiliesReport {
    fn render_text(&self, precision: Option<usize>) -> String {
        let mut text = String::new();
        for info in &self.families {
            let _ = writeln!(
                text,
                "{}\t{}\t{}",
                info.family,
                info.parameters.join(","),
                number_list(&info.defaults, precision)
            );
        }
        text
    }
}

pub fn run(ctx: &mut Context<'_>) -> Result<()> {
    let families = Family::ALL
        .iter()
        .map(|&family| FamilyInfo {
            family,
            discrete: family.is_discrete(),
            parameters: family.parameter_names(),
            defaults: UnivariateDistribution::default_for(family)
                .parameters()
                .into_inner(),
        })
        .collect();
    ctx.emit(&FamiliesReport { families })
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::{run, run_json};

    #[test]
    fn test_lists_every_family() {
        let report = run_json(&["cfd", "families"]);
        let families = report["families"].as_array().unwrap();
        assert_eq!(families.len(), 5);
        assert_eq!(families[2]["family"], "pareto");
        assert_eq!(
            families[2]["parameters"],
            serde_json::json!(["shape", "scale", "shift"])
        );
    }

    #[test]
    fn test_text_lines() {
        let out = run(&["cfd", "families", "--format", "text"]).unwrap();
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("poisson\trate\t1\n"));
    }
}
