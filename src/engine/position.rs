// src/engine/position.rs

use serde::Serialize;

use crate::config::SimulationConfig;
use crate::error::{Result, SimulationError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Long => "long",
            Side::Short => "short",
        }
    }

    /// +1 for long, -1 for short.
    pub fn sign(&self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

/// The single open position carried through a replay. "No position" is
/// `Option<Position>::None`, so an open price never exists without a side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub side:       Side,
    pub open_index: usize,  // bar whose actual price was used to open
    pub open_price: f64,
}

impl Position {
    pub fn open(side: Side, open_index: usize, open_price: f64) -> Self {
        Self { side, open_index, open_price }
    }

    /// Profit of closing at `close_price`:
    /// `(close - open) * (capital / open) * leverage`, sign-flipped for shorts.
    pub fn profit_at(&self, close_price: f64, close_index: usize, config: &SimulationConfig) -> Result<f64> {
        if self.open_price == 0.0 {
            return Err(SimulationError::DivisionByZero { index: close_index });
        }
        let raw = (close_price - self.open_price) * (config.capital / self.open_price) * config.leverage;
        let profit = match self.side {
            Side::Long => raw,
            Side::Short => -raw,
        };
        if !profit.is_finite() {
            return Err(SimulationError::NumericOverflow { index: close_index });
        }
        Ok(profit)
    }

    /// Realize the position at `close_price`, producing its trade record.
    pub fn close(self, close_index: usize, close_price: f64, config: &SimulationConfig) -> Result<Trade> {
        let profit = self.profit_at(close_price, close_index, config)?;
        Ok(Trade {
            side:        self.side,
            open_index:  self.open_index,
            close_index,
            open_price:  self.open_price,
            close_price,
            profit,
        })
    }
}

/// One realized round trip. Never mutated once recorded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Trade {
    pub side:        Side,
    pub open_index:  usize,
    pub close_index: usize,
    pub open_price:  f64,
    pub close_price: f64,
    pub profit:      f64,  // gross, before commission
}

impl Trade {
    /// Holding time in bars; 0 for a record whose close precedes its open.
    pub fn duration(&self) -> usize {
        self.close_index.saturating_sub(self.open_index)
    }
}
