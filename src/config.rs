// src/config.rs

//! Simulation parameters.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// Parameters of one simulation run.
///
/// `Default` gives the values the strategy was originally tuned with
/// (commission 5, capital 1000, leverage 100). Nothing in the engine reads
/// them implicitly; every run takes a config explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Flat fee charged once per closed trade.
    pub commission: f64,
    /// Notional base of every position.
    pub capital: f64,
    /// Multiplier applied to the notional.
    pub leverage: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            commission: 5.0,
            capital: 1000.0,
            leverage: 100.0,
        }
    }
}

impl SimulationConfig {
    pub fn new(commission: f64, capital: f64, leverage: f64) -> Self {
        Self {
            commission,
            capital,
            leverage,
        }
    }

    pub fn with_commission(mut self, commission: f64) -> Self {
        self.commission = commission;
        self
    }

    pub fn with_capital(mut self, capital: f64) -> Self {
        self.capital = capital;
        self
    }

    pub fn with_leverage(mut self, leverage: f64) -> Self {
        self.leverage = leverage;
        self
    }

    /// Effective position size: capital × leverage.
    pub fn notional(&self) -> f64 {
        self.capital * self.leverage
    }

    /// Requires `capital > 0`, `leverage > 0`, `commission >= 0`, all finite,
    /// and a finite notional.
    pub fn validate(&self) -> Result<()> {
        if !self.capital.is_finite() || self.capital <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "capital must be finite and > 0, got {}",
                self.capital
            )));
        }
        if !self.leverage.is_finite() || self.leverage <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "leverage must be finite and > 0, got {}",
                self.leverage
            )));
        }
        if !self.commission.is_finite() || self.commission < 0.0 {
            return Err(SimulationError::invalid(format!(
                "commission must be finite and >= 0, got {}",
                self.commission
            )));
        }
        if !self.notional().is_finite() {
            return Err(SimulationError::invalid(format!(
                "capital × leverage overflows: {} × {}",
                self.capital, self.leverage
            )));
        }
        Ok(())
    }

    /// Parse and validate a config from TOML. Missing keys fall back to
    /// the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)
            .map_err(|e| SimulationError::invalid(format!("parse config TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self)
            .map_err(|e| SimulationError::invalid(format!("serialize config TOML: {e}")))
    }
}
