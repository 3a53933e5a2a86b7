//! Application configuration.
//!
//! The configuration is loaded from a JSON file (`--config <path>`, or
//! `$XDG_CONFIG_HOME/bezier-ease/config.json`).  Every section is optional so
//! the file can grow without breaking older ones.
//!
//! # Example
//!
//! ```json
//! {
//!   "solver": {
//!     "newton_iterations": 8,
//!     "newton_tolerance": 1e-7,
//!     "derivative_epsilon": 1e-6,
//!     "bisection_tolerance": 1e-6
//!   },
//!   "curves": {
//!     "snappy": [0.2, 0.9, 0.3, 1.0],
//!     "drawer": "cubic-bezier(0.32, 0.72, 0, 1)",
//!     "fade": "ease-out"
//!   }
//! }
//! ```

use crate::bezier::{CurveError, EasingCurve, SolverConfig};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level configuration.
///
/// A minimal `{}` file is valid; missing sections fall back to their
/// compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root-finder tuning.
    #[serde(default)]
    pub solver: SolverConfig,

    /// User-named curves, in any form [`EasingCurve`] deserializes from.
    #[serde(default)]
    pub curves: BTreeMap<String, EasingCurve>,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        debug!(
            "loaded {} named curve(s) from {}",
            config.curves.len(),
            path.display()
        );
        Ok(config)
    }

    /// Resolve `name` to a curve: user-named curves first, then presets and
    /// `cubic-bezier(...)` text.
    pub fn curve(&self, name: &str) -> Result<EasingCurve, CurveError> {
        match self.curves.get(name) {
            Some(curve) => Ok(*curve),
            None => name.parse(),
        }
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
