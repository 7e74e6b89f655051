//! Configuration for the `qsat` tool.
//!
//! Values come from, highest precedence first:
//! 1. Command-line flags
//! 2. Environment variables (`QSAT_` prefix)
//! 3. A YAML file (`--config`, else `~/.qsat/config.yaml` when present)
//! 4. Defaults

use std::fmt;
use std::path::{Path, PathBuf};

use qsat_adapter_sim::DEFAULT_MAX_QUBITS;
use qsat_hal::HistogramOrder;
use qsat_logic::MAX_VARIABLES;
use qsat_search::{DEFAULT_GROWTH_RATE, DEFAULT_SHOTS, Synthesis};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Complete tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QsatConfig {
    /// Simulator settings.
    pub simulator: SimulatorConfig,
    /// Search settings.
    pub search: SearchConfig,
    /// Output settings.
    pub output: OutputConfig,
}

/// Simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Widest circuit the simulator accepts.
    pub max_qubits: u32,
    /// Sampling seed. Unset means a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: None,
        }
    }
}

/// Search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Shots per Grover round.
    pub shots: u32,
    /// Growth rate of the default iteration schedule.
    pub growth_rate: f64,
    /// Sample powers and outcomes instead of taking them as given.
    pub sample_from_iterations: bool,
    /// Oracle synthesis method.
    pub synthesis: Synthesis,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            growth_rate: DEFAULT_GROWTH_RATE,
            sample_from_iterations: false,
            synthesis: Synthesis::default(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Report format.
    pub format: OutputFormat,
    /// Histogram rows shown before truncating.
    pub max_rows: usize,
    /// Histogram row order.
    pub order: HistogramOrder,
    /// Colored terminal output.
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            max_rows: 16,
            order: HistogramOrder::Bitstring,
            color: true,
        }
    }
}

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text and histogram.
    #[default]
    Table,
    /// A single JSON document.
    Json,
}

impl OutputFormat {
    /// Parse `table` or `json`.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "table" | "text" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::Validation(format!(
                "Unknown output format '{other}' (expected 'table' or 'json')"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl QsatConfig {
    /// Load from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: QsatConfig =
            serde_yaml_ng::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// `~/.qsat/config.yaml`, if a home directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qsat").join("config.yaml"))
    }

    /// Load the file (explicit, else the default path when it exists) and
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(default) => {
                    debug!(path = %default.display(), "loading default config file");
                    Self::from_file(default)?
                }
                None => Self::default(),
            },
        };
        let config = config.merge_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QSAT_*` overrides looked up through `lookup`.
    ///
    /// Only variables that are set override anything; set but malformed
    /// values are errors.
    pub fn merge_env_with(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QSAT_SHOTS") {
            self.search.shots = parse_env("QSAT_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QSAT_SEED") {
            self.simulator.seed = Some(parse_env("QSAT_SEED", &v)?);
        }
        if let Some(v) = lookup("QSAT_MAX_QUBITS") {
            self.simulator.max_qubits = parse_env("QSAT_MAX_QUBITS", &v)?;
        }
        if let Some(v) = lookup("QSAT_GROWTH_RATE") {
            self.search.growth_rate = parse_env("QSAT_GROWTH_RATE", &v)?;
        }
        if let Some(v) = lookup("QSAT_SYNTHESIS") {
            self.search.synthesis = parse_env("QSAT_SYNTHESIS", &v)?;
        }
        if let Some(v) = lookup("QSAT_FORMAT") {
            self.output.format = OutputFormat::from_name(&v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.shots == 0 {
            return Err(ConfigError::Validation(
                "search.shots must be greater than 0".to_string(),
            ));
        }
        if self.search.growth_rate.is_nan() || self.search.growth_rate <= 1.0 {
            return Err(ConfigError::Validation(format!(
                "search.growth_rate must be greater than 1.0, got {}",
                self.search.growth_rate
            )));
        }
        #[allow(clippy::cast_possible_truncation)]
        let max = MAX_VARIABLES as u32;
        if !(1..=max).contains(&self.simulator.max_qubits) {
            return Err(ConfigError::Validation(format!(
                "simulator.max_qubits must be in 1..={max}, got {}",
                self.simulator.max_qubits
            )));
        }
        Ok(())
    }

    /// The configuration as YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml_ng::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn parse_env<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var: var.to_string(),
        message: e.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for {var}: {message}")]
    Env { var: String, message: String },

    #[error("Validation error: {0}")]
    Validation(String),
}
