// src/lib.rs

//! Replays a long/short flip strategy driven by next-price forecasts and
//! accounts its leveraged profit. Built as a Python extension with the
//! `extension-module` feature; usable as a plain Rust library without it.

pub mod config;
pub mod engine;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use config::SimulationConfig;
pub use engine::{
    analyze, calculate_total_profit, simulate, simulate_batch, Analysis, SimulationReport,
    position::{Side, Trade},
    scan_signals::scan_directions,
};
pub use error::{Result, SimulationError};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn forecast_backtester(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    python::register(m)
}
