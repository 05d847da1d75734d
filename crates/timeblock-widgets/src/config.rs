#![forbid(unsafe_code)]

//! Timeline configuration as data.
//!
//! Every tunable of the drag engine lives in one [`TimelineConfig`] that can
//! be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # timeblock.toml
//! step_ms = 300000          # 5 minute grid
//! throttle_interval_ms = 16
//!
//! [mock]
//! seed = 42
//! employees = { min = 10, max = 20 }
//! ```
//!
//! ```rust,ignore
//! let config = TimelineConfig::from_toml_file("timeblock.toml")?;
//! let config = TimelineConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! A 24 hour day on a 15 minute grid, 50ms move throttle, no minimum period
//! length, and a random mock roster of 300 to 1000 employees answering in
//! 200ms. Loading runs [`TimelineConfig::validate`] and fails on any problem.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use timeblock_core::{DragImagePolicy, NormalizeError, Normalizer, TrackerConfig};
use timeblock_model::{DAY_MS, QUARTER_HOUR_MS};

// ---------------------------------------------------------------------------
// TimelineConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Length of the displayed day.
    pub day_length_ms: u64,
    /// Rounding granularity for dragged values.
    pub step_ms: u64,
    /// Minimum spacing between delivered drag moves. 0 disables throttling.
    pub throttle_interval_ms: u64,
    /// Shortest period an edge drag may leave behind.
    pub min_period_ms: u64,
    /// Mock roster backend.
    pub mock: MockConfig,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            day_length_ms: DAY_MS as u64,
            step_ms: QUARTER_HOUR_MS as u64,
            throttle_interval_ms: 50,
            min_period_ms: 0,
            mock: MockConfig::default(),
        }
    }
}

/// Mock backend parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Serve the fixed three-employee sample instead of a random roster.
    pub sample: bool,
    /// Seed for the random roster. `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Roster size range for random mode.
    pub employees: EmployeeRange,
    /// Simulated response latency.
    pub latency_ms: u64,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            sample: false,
            seed: None,
            employees: EmployeeRange::default(),
            latency_ms: 200,
        }
    }
}

/// Inclusive roster size range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRange {
    pub min: usize,
    pub max: usize,
}

impl Default for EmployeeRange {
    fn default() -> Self {
        Self {
            min: 300,
            max: 1000,
        }
    }
}

impl TimelineConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Self>(s)
            .map_err(ConfigError::Toml)?
            .validated()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str::<Self>(s)
            .map_err(ConfigError::Json)?
            .validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load by extension: `.json` as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Serialize to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSerialize)
    }

    /// Check parameter ranges.
    ///
    /// Returns a list of problems. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.day_length_ms == 0 {
            errors.push("day_length_ms must be > 0".into());
        }
        if self.step_ms == 0 {
            errors.push("step_ms must be > 0".into());
        } else if self.step_ms > self.day_length_ms {
            errors.push(format!(
                "step_ms ({}) must not exceed day_length_ms ({})",
                self.step_ms, self.day_length_ms
            ));
        }
        if self.min_period_ms > self.day_length_ms {
            errors.push(format!(
                "min_period_ms ({}) must not exceed day_length_ms ({})",
                self.min_period_ms, self.day_length_ms
            ));
        }
        if self.mock.employees.min > self.mock.employees.max {
            errors.push(format!(
                "mock.employees.min ({}) must be <= mock.employees.max ({})",
                self.mock.employees.min, self.mock.employees.max
            ));
        }

        errors
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Day length as a domain range.
    #[inline]
    #[must_use]
    pub fn day_length(&self) -> f64 {
        self.day_length_ms as f64
    }

    /// Clamp-and-round policy for edge values over `[0, day_length]`.
    pub fn normalizer(&self) -> Result<Normalizer, ConfigError> {
        Normalizer::new(0.0, self.day_length(), Some(self.step_ms as f64))
            .map_err(ConfigError::Normalize)
    }

    /// Tracker settings derived from the throttle interval.
    #[must_use]
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            throttle_interval: Duration::from_millis(self.throttle_interval_ms),
            drag_image: DragImagePolicy::default(),
        }
    }

    /// Mock backend described by [`MockConfig`].
    #[cfg(feature = "mock")]
    pub fn mock_backend(&self) -> Result<timeblock_model::MockBackend, ConfigError> {
        use timeblock_model::MockBackend;

        let backend = if self.mock.sample {
            MockBackend::sample()
        } else {
            MockBackend::random(self.mock.seed)
                .with_employee_range(self.mock.employees.min, self.mock.employees.max)
                .map_err(|e| ConfigError::Validation(vec![e.to_string()]))?
        };
        Ok(backend.with_latency(Duration::from_millis(self.mock.latency_ms)))
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from loading or applying configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// TOML serialization error.
    TomlSerialize(toml::ser::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
    /// Bounds or step rejected by the normalizer.
    Normalize(NormalizeError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::TomlSerialize(e) => write!(f, "TOML serialize error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
            Self::Normalize(e) => write!(f, "normalizer error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::TomlSerialize(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
            Self::Normalize(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
