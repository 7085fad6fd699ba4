//! Logging configuration and subscriber setup.
//!
//! Levels and formats resolve from, lowest to highest precedence:
//! - `RUST_LOG` (the most verbose level plus any `target=level` directives)
//! - `CFD_LOG`
//! - `CFD_LOG_FORMAT`
//! - CLI flags (`-v`, `-q`, `--log-format`)
//!
//! Logs always go to stderr so stdout carries only command payloads.

use std::io::IsTerminal;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format (default).
    #[default]
    Human,
    /// Machine-parseable JSON lines.
    Jsonl,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" | "console" | "pretty" => Ok(LogFormat::Human),
            "jsonl" | "json" | "structured" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Log level filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    /// Warnings and errors only (default).
    #[default]
    Warn,
    Error,
    /// Completely silent.
    Off,
}

impl LogLevel {
    /// Level selected by `-v`/`-q` counts, or `None` when neither was given.
    pub fn from_verbosity(verbose: u8, quiet: bool) -> Option<Self> {
        if quiet {
            return Some(LogLevel::Error);
        }
        match verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" | "none" | "quiet" => Ok(LogLevel::Off),
            _ => Err(format!("unknown log level: {}", s)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Off => write!(f, "off"),
        }
    }
}

impl From<LogLevel> for tracing_subscriber::filter::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing_subscriber::filter::LevelFilter::TRACE,
            LogLevel::Debug => tracing_subscriber::filter::LevelFilter::DEBUG,
            LogLevel::Info => tracing_subscriber::filter::LevelFilter::INFO,
            LogLevel::Warn => tracing_subscriber::filter::LevelFilter::WARN,
            LogLevel::Error => tracing_subscriber::filter::LevelFilter::ERROR,
            LogLevel::Off => tracing_subscriber::filter::LevelFilter::OFF,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    pub level: LogLevel,
    /// Per-target `RUST_LOG` directives (e.g. `cfd_dist::estimate=trace`),
    /// kept only while `RUST_LOG` decides the level.
    pub target_directives: Vec<String>,
}

impl LogConfig {
    /// Create config from the process environment and CLI overrides.
    pub fn from_env(cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), cli_level, cli_format)
    }

    /// Same as [`LogConfig::from_env`] with an explicit variable lookup.
    pub fn from_lookup<F>(lookup: F, cli_level: Option<LogLevel>, cli_format: Option<LogFormat>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LogConfig::default();

        // CFD_LOG takes precedence over RUST_LOG
        if let Some(level) = lookup("CFD_LOG").and_then(|v| v.parse::<LogLevel>().ok()) {
            config.level = level;
        } else if let Some(val) = lookup("RUST_LOG") {
            if let Some(level) = most_verbose_level(&val) {
                config.level = level;
            }
            config.target_directives = target_directives(&val);
        }

        if let Some(format) = lookup("CFD_LOG_FORMAT").and_then(|v| v.parse::<LogFormat>().ok()) {
            config.format = format;
        }

        if let Some(level) = cli_level {
            config.level = level;
            config.target_directives.clear();
        }
        if let Some(format) = cli_format {
            config.format = format;
        }

        config
    }

    /// Filter directives covering the binary and the library crates, followed
    /// by any per-target overrides.
    pub fn directives(&self) -> String {
        ["cfd", "cfd_cli", "cfd_dist", "cfd_math"]
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .chain(self.target_directives.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Level named by a single directive: the whole directive when it has no
/// target, else the part after `=`.
fn directive_level(directive: &str) -> Option<LogLevel> {
    let value = match directive.rsplit_once('=') {
        Some((_, value)) => value,
        None => directive,
    };
    value.trim().parse().ok()
}

/// Most verbose level named in a `RUST_LOG` directive string.
fn most_verbose_level(directives: &str) -> Option<LogLevel> {
    directives.split(',').filter_map(directive_level).min()
}

/// Directives of the form `target=level` with a recognised level.
fn target_directives(directives: &str) -> Vec<String> {
    directives
        .split(',')
        .map(str::trim)
        .filter(|d| d.contains('=') && directive_level(d).is_some())
        .map(str::to_string)
        .collect()
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &LogConfig) {
    let filter = EnvFilter::new(config.directives());

    let installed = match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(use_ansi);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Jsonl => {
            let json_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(json_layer)
                .try_init()
        }
    };

    if installed.is_err() {
        tracing::debug!("logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("human".parse::<LogFormat>().unwrap(), LogFormat::Human);
        assert_eq!("jsonl".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Jsonl);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("quiet".parse::<LogLevel>().unwrap(), LogLevel::Off);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(LogLevel::from_verbosity(0, false), None);
        assert_eq!(LogLevel::from_verbosity(1, false), Some(LogLevel::Info));
        assert_eq!(LogLevel::from_verbosity(2, false), Some(LogLevel::Debug));
        assert_eq!(LogLevel::from_verbosity(7, false), Some(LogLevel::Trace));
        assert_eq!(LogLevel::from_verbosity(3, true), Some(LogLevel::Error));
    }

    #[test]
    fn test_env_precedence() {
        let config = LogConfig::from_lookup(env(&[]), None, None);
        assert_eq!(config, LogConfig::default());

        let config = LogConfig::from_lookup(env(&[("RUST_LOG", "cfd_dist=debug")]), None, None);
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.target_directives, vec!["cfd_dist=debug".to_string()]);

        let config = LogConfig::from_lookup(
            env(&[("RUST_LOG", "trace"), ("CFD_LOG", "error")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Error);

        let config = LogConfig::from_lookup(env(&[("CFD_LOG_FORMAT", "jsonl")]), None, None);
        assert_eq!(config.format, LogFormat::Jsonl);
    }

    #[test]
    fn test_rust_log_levels_match_whole_words() {
        let config = LogConfig::from_lookup(env(&[("RUST_LOG", "information=warn")]), None, None);
        assert_eq!(config.level, LogLevel::Warn);

        let config = LogConfig::from_lookup(
            env(&[("RUST_LOG", "error, cfd_dist::estimate=trace,debugger=info")]),
            None,
            None,
        );
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(
            config.target_directives,
            vec!["cfd_dist::estimate=trace".to_string(), "debugger=info".to_string()]
        );

        let config = LogConfig::from_lookup(env(&[("RUST_LOG", "tracer,x=loud")]), None, None);
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn test_explicit_level_drops_rust_log_targets() {
        let config = LogConfig::from_lookup(
            env(&[("RUST_LOG", "cfd_dist=trace")]),
            Some(LogLevel::Error),
            None,
        );
        assert_eq!(config.level, LogLevel::Error);
        assert!(config.target_directives.is_empty());
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = LogConfig::from_lookup(
            env(&[("CFD_LOG", "error"), ("CFD_LOG_FORMAT", "jsonl")]),
            Some(LogLevel::Debug),
            Some(LogFormat::Human),
        );
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Human);
    }

    #[test]
    fn test_directives() {
        let config = LogConfig {
            level: LogLevel::Debug,
            ..LogConfig::default()
        };
        assert_eq!(
            config.directives(),
            "cfd=debug,cfd_cli=debug,cfd_dist=debug,cfd_math=debug"
        );

        let config = LogConfig {
            target_directives: vec!["cfd_dist::estimate=trace".to_string()],
            ..LogConfig::default()
        };
        assert_eq!(
            config.directives(),
            "cfd=warn,cfd_cli=warn,cfd_dist=warn,cfd_math=warn,cfd_dist::estimate=trace"
        );
    }
}
