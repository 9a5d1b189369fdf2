//! Configuration for the firewatch ledger.

use serde::{Deserialize, Serialize};

use crate::types::{FirewatchError, RegionalRiskFactor, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FirewatchConfig {
    /// Risk scoring configuration
    pub risk: RiskConfig,
    /// General settings
    pub general: GeneralConfig,
}

impl FirewatchConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| FirewatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| FirewatchError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| FirewatchError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.risk.validate()
    }
}

/// Risk scoring configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Base risk for regions with no stored factors
    pub default_base_risk: i64,
    /// Seasonal multiplier (percent) for regions with no stored factors
    pub default_seasonal_multiplier: i64,
    /// Scores strictly above this are high risk
    pub high_risk_threshold: i64,
    /// Numerator of the water proximity term (numerator / distance)
    pub water_proximity_numerator: i64,
}

impl RiskConfig {
    /// Factors applied when a region has none stored.
    pub fn default_regional_factor(&self) -> RegionalRiskFactor {
        RegionalRiskFactor {
            base_risk: self.default_base_risk,
            seasonal_multiplier: self.default_seasonal_multiplier,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.water_proximity_numerator < 0 {
            return Err(FirewatchError::Config(format!(
                "water_proximity_numerator must be non-negative, got {}",
                self.water_proximity_numerator
            )));
        }
        Ok(())
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            default_base_risk: 50,
            default_seasonal_multiplier: 10,
            high_risk_threshold: 70,
            water_proximity_numerator: 100,
        }
    }
}

/// General configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level for the embedding application's subscriber
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
