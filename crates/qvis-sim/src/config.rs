//! Simulator configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QVIS_ prefix)
//! 3. .env files
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;

use qvis_ir::CircuitLimits;
use qvis_ir::circuit::ADDRESSABLE_QUBITS;

/// Complete simulator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SimulatorConfig {
    /// Admission limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Engine tuning
    #[serde(default)]
    pub engine: EngineConfig,

    /// Logging for binaries embedding the simulator
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Admission limits checked before any allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Maximum qubit count
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Maximum operations per circuit
    #[serde(default = "default_max_operations")]
    pub max_operations: usize,

    /// Largest amplitude array, in bytes, a single run may allocate
    #[serde(default = "default_memory_budget")]
    pub memory_budget_bytes: u64,

    /// Maximum measurement shots per request
    #[serde(default = "default_max_shots")]
    pub max_shots: u32,
}

/// Engine tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Allowed |Σ|a|² − 1| after evolution
    #[serde(default = "default_norm_tolerance")]
    pub norm_tolerance: f64,

    /// Qubit count from which gate kernels run on the rayon pool
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold_qubits: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: "console" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Bytes per amplitude (`Complex64`).
pub const AMPLITUDE_BYTES: u64 = 16;

// Default value functions
fn default_max_qubits() -> u32 {
    qvis_ir::circuit::DEFAULT_MAX_QUBITS
}

fn default_max_operations() -> usize {
    qvis_ir::circuit::DEFAULT_MAX_OPERATIONS
}

fn default_memory_budget() -> u64 {
    AMPLITUDE_BYTES << default_max_qubits() // 256 MiB
}

fn default_max_shots() -> u32 {
    1_000_000
}

fn default_norm_tolerance() -> f64 {
    1e-6
}

fn default_parallel_threshold() -> u32 {
    crate::statevector::DEFAULT_PARALLEL_THRESHOLD
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "console".to_string()
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_qubits: default_max_qubits(),
            max_operations: default_max_operations(),
            memory_budget_bytes: default_memory_budget(),
            max_shots: default_max_shots(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            norm_tolerance: default_norm_tolerance(),
            parallel_threshold_qubits: default_parallel_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SimulatorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.as_ref().display())))?;

        let config: SimulatorConfig = serde_yaml_ng::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with the following precedence:
    /// 1. Load .env file if it exists
    /// 2. Load from file if provided
    /// 3. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = if let Some(path) = config_file {
            Self::from_file(path)?
        } else {
            SimulatorConfig::default()
        };

        let config = config.merge_env(|key| std::env::var(key).ok())?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`, which maps `QVIS_*` variable names to
    /// their values.
    ///
    /// Only variables that are present override the file-loaded (or default)
    /// values. A present but unparsable numeric value is an error.
    pub fn merge_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Limits
        if let Some(v) = parse_var(&lookup, "QVIS_MAX_QUBITS")? {
            self.limits.max_qubits = v;
        }
        if let Some(v) = parse_var(&lookup, "QVIS_MAX_OPERATIONS")? {
            self.limits.max_operations = v;
        }
        if let Some(v) = parse_var(&lookup, "QVIS_MEMORY_BUDGET_BYTES")? {
            self.limits.memory_budget_bytes = v;
        }
        if let Some(v) = parse_var(&lookup, "QVIS_MAX_SHOTS")? {
            self.limits.max_shots = v;
        }

        // Engine
        if let Some(v) = parse_var(&lookup, "QVIS_NORM_TOLERANCE")? {
            self.engine.norm_tolerance = v;
        }
        if let Some(v) = parse_var(&lookup, "QVIS_PARALLEL_THRESHOLD_QUBITS")? {
            self.engine.parallel_threshold_qubits = v;
        }

        // Logging
        if let Some(v) = lookup("QVIS_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("QVIS_LOG_FORMAT") {
            self.logging.format = v;
        }

        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_qubits == 0 || self.limits.max_qubits > ADDRESSABLE_QUBITS {
            return Err(ConfigError::ValidationError(format!(
                "max_qubits must be in 1..={ADDRESSABLE_QUBITS}, got {}",
                self.limits.max_qubits
            )));
        }

        if self.limits.max_operations == 0 {
            return Err(ConfigError::ValidationError(
                "max_operations must be greater than 0".to_string(),
            ));
        }

        if self.limits.max_shots == 0 {
            return Err(ConfigError::ValidationError(
                "max_shots must be greater than 0".to_string(),
            ));
        }

        // A single qubit must always fit.
        if self.limits.memory_budget_bytes < 2 * AMPLITUDE_BYTES {
            return Err(ConfigError::ValidationError(format!(
                "memory_budget_bytes must be at least {}",
                2 * AMPLITUDE_BYTES
            )));
        }

        if !(self.engine.norm_tolerance.is_finite() && self.engine.norm_tolerance > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "norm_tolerance must be a positive number, got {}",
                self.engine.norm_tolerance
            )));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: {other}"
                )));
            }
        }

        match self.logging.format.as_str() {
            "console" | "json" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: {other}"
                )));
            }
        }

        Ok(())
    }

    /// Circuit validation limits derived from this configuration.
    pub fn circuit_limits(&self) -> CircuitLimits {
        CircuitLimits {
            max_qubits: self.limits.max_qubits,
            max_operations: self.limits.max_operations,
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            ConfigError::ValidationError(format!("{key} has an invalid value: {raw}"))
        }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
