//! Settings file discovery, loading and validation.
//!
//! Resolution order: `--config` → `CFD_CONFIG` → `CFD_CONFIG_DIR/cfd.json` →
//! `<user config dir>/cfd/cfd.json` → built-in defaults.

use std::path::{Path, PathBuf};

use cfd_dist::FitConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::output::OutputFormat;

/// Environment variable naming a settings file directly.
pub const ENV_CONFIG_PATH: &str = "CFD_CONFIG";
/// Environment variable naming a directory holding `cfd.json`.
pub const ENV_CONFIG_DIR: &str = "CFD_CONFIG_DIR";

const CONFIG_FILENAME: &str = "cfd.json";
const APP_NAME: &str = "cfd";

/// Largest number of fractional digits text output will print.
pub const MAX_PRECISION: usize = 17;

/// Errors raised while locating, reading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl ConfigError {
    /// Stable numeric code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ConfigError::NotFound { .. } => 40,
            ConfigError::Io { .. } => 41,
            ConfigError::Parse { .. } => 42,
            ConfigError::InvalidValue { .. } => 43,
        }
    }
}

/// Sampling defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingSettings {
    /// Seed used when `--seed` is absent. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Draw count used when `-n` is absent.
    pub count: usize,
}

impl Default for SamplingSettings {
    fn default() -> Self {
        Self {
            seed: None,
            count: 10,
        }
    }
}

/// Output defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Format used when `--format` is absent.
    pub format: OutputFormat,
    /// Fractional digits for text output; `None` prints the shortest exact form.
    pub precision: Option<usize>,
}

/// Everything a settings file may configure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub fit: FitConfig,
    pub sampling: SamplingSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Semantic checks serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fit.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fit.max_iterations",
                message: "must be at least 1".to_string(),
            });
        }
        if !(self.fit.tolerance.is_finite() && self.fit.tolerance > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "fit.tolerance",
                message: format!("must be finite and > 0, got {}", self.fit.tolerance),
            });
        }
        if self.sampling.count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sampling.count",
                message: "must be at least 1".to_string(),
            });
        }
        if let Some(precision) = self.output.precision {
            if precision > MAX_PRECISION {
                return Err(ConfigError::InvalidValue {
                    field: "output.precision",
                    message: format!("must be <= {MAX_PRECISION}, got {precision}"),
                });
            }
        }
        Ok(())
    }
}

/// Where the active settings came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via `--config`.
    CliArgument,
    /// Named by `CFD_CONFIG`.
    Environment,
    /// Found under `CFD_CONFIG_DIR`.
    ConfigDir,
    /// Found in the user's config directory.
    XdgConfig,
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigDir => write!(f, "config directory variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Candidate locations for the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLocator {
    pub cli_path: Option<PathBuf>,
    pub env_path: Option<PathBuf>,
    pub env_dir: Option<PathBuf>,
    pub user_dir: Option<PathBuf>,
}

impl ConfigLocator {
    /// Candidates from the process environment and the platform config dir.
    pub fn from_env(cli_path: Option<&Path>) -> Self {
        Self {
            cli_path: cli_path.map(Path::to_path_buf),
            env_path: std::env::var_os(ENV_CONFIG_PATH)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            env_dir: std::env::var_os(ENV_CONFIG_DIR)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            user_dir: dirs::config_dir().map(|dir| dir.join(APP_NAME)),
        }
    }

    /// First existing candidate in resolution order.
    ///
    /// Explicit paths (`--config`, `CFD_CONFIG`) must exist; directory
    /// candidates are skipped when they hold no settings file.
    pub fn locate(&self) -> Result<Option<(PathBuf, ConfigSource)>, ConfigError> {
        let explicit = [
            (&self.cli_path, ConfigSource::CliArgument),
            (&self.env_path, ConfigSource::Environment),
        ];
        for (candidate, source) in explicit {
            if let Some(path) = candidate {
                if !path.is_file() {
                    return Err(ConfigError::NotFound { path: path.clone() });
                }
                return Ok(Some((path.clone(), source)));
            }
        }

        let directories = [
            (&self.env_dir, ConfigSource::ConfigDir),
            (&self.user_dir, ConfigSource::XdgConfig),
        ];
        for (candidate, source) in directories {
            if let Some(dir) = candidate {
                let path = dir.join(CONFIG_FILENAME);
                if path.is_file() {
                    return Ok(Some((path, source)));
                }
            }
        }

        Ok(None)
    }

    /// Locate, read and validate the settings.
    pub fn load(&self) -> Result<LoadedSettings, ConfigError> {
        let Some((path, source)) = self.locate()? else {
            debug!("no settings file found, using defaults");
            return Ok(LoadedSettings::default());
        };
        let settings = load_settings_file(&path)?;
        debug!(path = %path.display(), %source, "loaded settings");
        Ok(LoadedSettings {
            settings,
            source,
            path: Some(path),
        })
    }
}

/// Settings together with their provenance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub source: ConfigSource,
    pub path: Option<PathBuf>,
}

/// Read, parse and validate one settings file.
pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    settings.validate()?;
    Ok(settings)
}
