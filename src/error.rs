// src/error.rs

use thiserror::Error;

/// Everything a simulation run can fail with. Runs are pure, so there is
/// nothing to retry: the first error aborts the run and no partial report
/// is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Empty or misaligned sequences, non-finite prices, or bad parameters.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A position was closed against an open price of exactly zero.
    #[error("division by zero: open price is 0 when closing at index {index}")]
    DivisionByZero { index: usize },

    /// Profit accounting left the range of finite `f64` values.
    #[error("numeric overflow in profit computation at index {index}")]
    NumericOverflow { index: usize },
}

impl SimulationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimulationError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
