//! Report rendering for stdout.
//!
//! Every command builds a serializable report. JSON output is the report
//! itself (non-finite numbers become `null`); text output is a compact,
//! line-oriented rendering meant for shell pipelines.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Output format for command payloads.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Text => write!(f, "text"),
        }
    }
}

/// A report with a plain-text rendering.
pub trait Render: Serialize {
    /// Text form, one record per line, newline-terminated.
    fn render_text(&self, precision: Option<usize>) -> String;
}

/// Format a number for text output.
pub fn number(value: f64, precision: Option<usize>) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    match precision {
        Some(digits) => format!("{value:.digits$}"),
        None => value.to_string(),
    }
}

/// Join numbers with commas, e.g. a parameter vector.
pub fn number_list(values: &[f64], precision: Option<usize>) -> String {
    values
        .iter()
        .map(|&v| number(v, precision))
        .collect::<Vec<_>>()
        .join(",")
}

/// Write `report` to `out` in `format`.
pub fn emit<R: Render>(
    out: &mut dyn Write,
    format: OutputFormat,
    precision: Option<usize>,
    report: &R,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, report)?;
            writeln!(out)?;
        }
        OutputFormat::Text => out.write_all(report.render_text(precision).as_bytes())?,
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Pair {
        x: f64,
        y: f64,
    }

    impl Render for Pair {
        fn render_text(&self, precision: Option<usize>) -> String {
            format!("{}\t{}\n", number(self.x, precision), number(self.y, precision))
        }
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(number(0.25, None), "0.25");
        assert_eq!(number(1.0 / 3.0, Some(4)), "0.3333");
        assert_eq!(number(f64::INFINITY, Some(2)), "inf");
        assert_eq!(number(f64::NEG_INFINITY, None), "-inf");
        assert_eq!(number(f64::NAN, None), "nan");
        assert_eq!(number_list(&[1.0, 0.5], None), "1,0.5");
    }

    #[test]
    fn test_emit_json_and_text() {
        let report = Pair { x: 1.5, y: f64::INFINITY };

        let mut buf = Vec::new();
        emit(&mut buf, OutputFormat::Json, None, &report).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["x"], 1.5);
        assert!(value["y"].is_null());

        let mut buf = Vec::new();
        emit(&mut buf, OutputFormat::Text, Some(1), &report).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1.5\tinf\n");
    }
}
