//! runtime configuration for a witness calculation

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, WitnessError};

/// knobs the host can set per calculator
///
/// loadable from toml; missing keys fall back to [`WitnessConfig::default`]:
///
/// ```toml
/// parallel = true
/// strict_reads = true
/// verify_release = true
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WitnessConfig {
    /// run subcomponents the template marks as parallel on worker threads
    pub parallel: bool,
    /// reject reads of arena cells nobody has written
    pub strict_reads: bool,
    /// after the root run, check every non-root component was released
    pub verify_release: bool,
}

impl Default for WitnessConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            strict_reads: true,
            verify_release: true,
        }
    }
}

impl WitnessConfig {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| WitnessError::InvalidInput(format!("config: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            WitnessError::InvalidInput(format!("failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }
}
