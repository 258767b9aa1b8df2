//! Run configuration stored as YAML in the data directory.
//!
//! ```yaml
//! prices: ~/data/closes.csv
//! tickers: [VTI, BND, GLD]
//! simulations: 20000
//! risk_free_rate: 0.02
//! periods_per_year: 252.0
//! lookback_years: 5
//! sampling: uniform_normalized
//! ```
//!
//! Every field is optional; command-line flags override the file.

use std::path::{Path, PathBuf};

use frontier_core::{
    DEFAULT_NUM_PORTFOLIOS, DEFAULT_RISK_FREE_RATE, TRADING_DAYS_PER_YEAR, WeightSampling,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::util::io::atomic_write;

/// Years of history used when no lookback is configured
pub const DEFAULT_LOOKBACK_YEARS: i16 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// CSV file of closing prices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<PathBuf>,
    /// Tickers to analyze; empty means every column in the price file
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tickers: Vec<String>,
    pub simulations: usize,
    /// Annual risk-free rate as a fraction
    pub risk_free_rate: f64,
    pub periods_per_year: f64,
    /// Only use this many years of history, counted back from the latest date
    pub lookback_years: Option<i16>,
    pub sampling: WeightSampling,
    /// Fixed seed for reproducible runs; drawn from OS entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            prices: None,
            tickers: Vec::new(),
            simulations: DEFAULT_NUM_PORTFOLIOS,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            periods_per_year: TRADING_DAYS_PER_YEAR,
            lookback_years: Some(DEFAULT_LOOKBACK_YEARS),
            sampling: WeightSampling::default(),
            seed: None,
        }
    }
}

impl RunConfig {
    /// Default config file location inside the data directory
    pub fn path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.yaml")
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Load the config file, falling back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = self
            .to_yaml()
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        atomic_write(path, &yaml)?;
        tracing::info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Check values that would otherwise fail deep inside a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulations == 0 {
            return Err(ConfigError::Invalid(
                "simulations must be at least 1".to_string(),
            ));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "risk_free_rate {} is not a number",
                self.risk_free_rate
            )));
        }
        if !(self.periods_per_year.is_finite() && self.periods_per_year > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }
        if let Some(years) = self.lookback_years
            && years <= 0
        {
            return Err(ConfigError::Invalid(format!(
                "lookback_years must be positive, got {years}"
            )));
        }
        Ok(())
    }
}
