//! Sweep configuration, read from TOML
//!
//! Every field is optional; missing fields take the values of the standard iJO1366 sweep:
//!
//! ```toml
//! ammonia = { range = { start = 0.0, stop = 100.0, step = 10.0 } }
//! glucose = { range = { start = 10.0, stop = 21.0, step = 1.0 } }
//! maintenance = { linspace = { start = 0.0, stop = 20.0, num = 5 } }
//!
//! [reactions]
//! ammonia_exchange = "EX_nh4_e"
//! glucose_exchange = "EX_glc__D_e"
//! maintenance = "ATPM"
//! co2_exchange = "EX_co2_e"
//! ```
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::carbon::DEFAULT_CO2_EXCHANGE;
use crate::sweep::grid::Grid;

/// Grids and reaction ids of a full run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Ammonia uptake bounds of the nitrogen sweep
    pub ammonia: Grid,
    /// Glucose uptake bounds of the carbon sweep
    pub glucose: Grid,
    /// Maintenance flux values, used by all three sweeps
    pub maintenance: Grid,
    pub reactions: SweepReactions,
}

impl Default for SweepConfig {
    fn default() -> Self {
        SweepConfig {
            ammonia: Grid::Range {
                start: 0.,
                stop: 100.,
                step: 10.,
            },
            glucose: Grid::Range {
                start: 10.,
                stop: 21.,
                step: 1.,
            },
            maintenance: Grid::Linspace {
                start: 0.,
                stop: 20.,
                num: 5,
            },
            reactions: SweepReactions::default(),
        }
    }
}

/// Reactions the sweeps act on
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepReactions {
    pub ammonia_exchange: String,
    pub glucose_exchange: String,
    /// Reaction whose lower bound is the non-growth associated maintenance flux
    pub maintenance: String,
    pub co2_exchange: String,
}

impl Default for SweepReactions {
    fn default() -> Self {
        SweepReactions {
            ammonia_exchange: "EX_nh4_e".to_string(),
            glucose_exchange: "EX_glc__D_e".to_string(),
            maintenance: "ATPM".to_string(),
            co2_exchange: DEFAULT_CO2_EXCHANGE.to_string(),
        }
    }
}

impl SweepConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to read sweep configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid sweep configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grids() {
        let config = SweepConfig::default();
        assert_eq!(config.ammonia.values().len(), 10);
        assert_eq!(config.glucose.values().len(), 11);
        assert_eq!(config.maintenance.values().len(), 5);
        assert_eq!(config.reactions.maintenance, "ATPM");
        assert_eq!(config.reactions.co2_exchange, "EX_co2_e");
    }

    #[test]
    fn empty_file_is_default() {
        assert_eq!(SweepConfig::from_toml_str("").unwrap(), SweepConfig::default());
    }

    #[test]
    fn partial_file() {
        let config = SweepConfig::from_toml_str(
            r#"
            maintenance = { values = [0.0, 3.15] }

            [reactions]
            maintenance = "NGAM"
            "#,
        )
        .unwrap();
        assert_eq!(config.maintenance.values(), vec![0., 3.15]);
        assert_eq!(config.reactions.maintenance, "NGAM");
        assert_eq!(config.reactions.glucose_exchange, "EX_glc__D_e");
        assert_eq!(config.ammonia, SweepConfig::default().ammonia);
    }

    #[test]
    fn grid_kinds() {
        let config = SweepConfig::from_toml_str(
            r#"
            ammonia = { linspace = { start = 0.0, stop = 10.0, num = 3 } }
            glucose = { range = { start = 1.0, stop = 4.0, step = 1.0 } }
            "#,
        )
        .unwrap();
        assert_eq!(config.ammonia.values(), vec![0., 5., 10.]);
        assert_eq!(config.glucose.values(), vec![1., 2., 3.]);
    }

    #[test]
    fn invalid_file() {
        let err = SweepConfig::from_toml_str("ammonia = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        let err = SweepConfig::from_file("/nonexistent/sweep.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
