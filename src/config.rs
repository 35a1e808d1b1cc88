//! Tunable constants for parsing and analysis
//!
//! The sentinel token, the data-row heuristic and the force-curve window are
//! empirical properties of the instrument firmware, so they live here rather
//! than being hard-coded in the algorithms.

use crate::error::{FluxError, Result};
use serde::{Deserialize, Serialize};

/// Default section sentinel prefix
pub const DEFAULT_SENTINEL: &str = "#ERROR!";

/// Characters stripped from the first field before the all-digits check
pub const DEFAULT_DATA_ROW_IGNORED_CHARS: &str = ".-";

/// Second-row header label marking a boat-level column
pub const DEFAULT_BOAT_SUB_LABEL: &str = "Boat";

/// Half width of the force-curve window around a stroke (ms)
pub const DEFAULT_STROKE_HALF_WINDOW_MS: i64 = 2000;

/// Parser settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Prefix of every section marker line (`<sentinel>,<Section Name>`)
    pub sentinel: String,
    /// Characters removed from a row's first field before classifying it
    pub data_row_ignored_chars: String,
    /// Sub-label that is suppressed when merging two header rows
    pub boat_sub_label: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            sentinel: DEFAULT_SENTINEL.to_string(),
            data_row_ignored_chars: DEFAULT_DATA_ROW_IGNORED_CHARS.to_string(),
            boat_sub_label: DEFAULT_BOAT_SUB_LABEL.to_string(),
        }
    }
}

impl ParserConfig {
    /// Marker searched for when locating a section
    pub fn marker_for(&self, token: &str) -> String {
        format!("{},{}", self.sentinel, token)
    }
}

/// Analysis settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Periodic samples strictly closer than this to a stroke belong to it
    pub stroke_half_window_ms: i64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stroke_half_window_ms: DEFAULT_STROKE_HALF_WINDOW_MS,
        }
    }
}

/// Values that replace individual fields of a loaded configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub sentinel: Option<String>,
    pub stroke_half_window_ms: Option<i64>,
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluxConfig {
    pub parser: ParserConfig,
    pub analysis: AnalysisConfig,
}

impl FluxConfig {
    /// Load and validate configuration from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: FluxConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Apply overrides field by field, then validate the result
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(sentinel) = &overrides.sentinel {
            self.parser.sentinel = sentinel.clone();
        }
        if let Some(window) = overrides.stroke_half_window_ms {
            self.analysis.stroke_half_window_ms = window;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants the algorithms rely on
    pub fn validate(&self) -> Result<()> {
        if self.parser.sentinel.trim().is_empty() {
            return Err(FluxError::InvalidConfig(
                "sentinel must not be empty".to_string(),
            ));
        }
        if self.analysis.stroke_half_window_ms <= 0 {
            return Err(FluxError::InvalidConfig(format!(
                "stroke_half_window_ms must be positive, got {}",
                self.analysis.stroke_half_window_ms
            )));
        }
        Ok(())
    }
}
