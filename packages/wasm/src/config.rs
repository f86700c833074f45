//! Visualizer configuration.
//!
//! All view settings live in one explicit value owned by the top-level
//! controller. Persistence goes through [`VisualizerConfig::to_json`] and
//! [`VisualizerConfig::from_json`]; nothing is read from ambient storage.

use serde::{Deserialize, Serialize};

use crate::error::{VizError, VizResult};

/// Bounds applied to user input before any stepper runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InputLimits {
    /// Maximum number of array elements.
    pub max_len: usize,
    /// Maximum absolute value of any array element or key.
    pub max_abs_value: i64,
    /// Maximum number of graph nodes.
    pub max_nodes: usize,
    /// Maximum side length of a square matrix.
    pub max_matrix_dim: usize,
    /// Maximum number of scripted operations (hash map, stack/queue).
    pub max_ops: usize,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_len: 64,
            max_abs_value: 9999,
            max_nodes: 26,
            max_matrix_dim: 8,
            max_ops: 64,
        }
    }
}

/// Configuration for a visualizer instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisualizerConfig {
    /// Interval between automatic advances, in milliseconds.
    pub speed_ms: u32,
    /// Fastest allowed interval.
    pub min_speed_ms: u32,
    /// Slowest allowed interval.
    pub max_speed_ms: u32,
    /// Input bounds.
    pub limits: InputLimits,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            speed_ms: 500,
            min_speed_ms: 50,
            max_speed_ms: 5000,
            limits: InputLimits::default(),
        }
    }
}

impl VisualizerConfig {
    /// Check that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns `VizError::Config` for an empty speed range, a speed outside
    /// it, or a zero limit.
    pub fn validate(&self) -> VizResult<()> {
        if self.min_speed_ms == 0 {
            return Err(VizError::config("minSpeedMs must be positive"));
        }
        if self.min_speed_ms > self.max_speed_ms {
            return Err(VizError::config(format!(
                "minSpeedMs ({}) exceeds maxSpeedMs ({})",
                self.min_speed_ms, self.max_speed_ms
            )));
        }
        if !(self.min_speed_ms..=self.max_speed_ms).contains(&self.speed_ms) {
            return Err(VizError::config(format!(
                "speedMs ({}) outside {}..={}",
                self.speed_ms, self.min_speed_ms, self.max_speed_ms
            )));
        }
        let l = &self.limits;
        if l.max_len == 0 || l.max_nodes == 0 || l.max_matrix_dim == 0 || l.max_ops == 0 {
            return Err(VizError::config("input limits must be positive"));
        }
        if l.max_abs_value <= 0 {
            return Err(VizError::config("maxAbsValue must be positive"));
        }
        Ok(())
    }

    /// Clamp a requested speed into the configured range.
    #[must_use]
    pub fn clamp_speed(&self, speed_ms: u32) -> u32 {
        speed_ms.clamp(self.min_speed_ms, self.max_speed_ms)
    }

    /// Serialize for persistence.
    ///
    /// # Errors
    ///
    /// Returns `VizError::Json` if serialization fails.
    pub fn to_json(&self) -> VizResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore a persisted configuration. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns `VizError::Json` for malformed JSON and `VizError::Config` if
    /// the restored values are inconsistent.
    pub fn from_json(json: &str) -> VizResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
