// src/engine/prepare_inputs.rs

use crate::error::{Result, SimulationError};

/// Check that the two series can be replayed and return their length.
///
/// `predicted[0]` is never read by the replay (the forecast for step i is
/// `predicted[i + 1]`), so only `predicted[1..]` must be finite. Every
/// actual price is read.
pub fn prepare_inputs(predicted: &[f64], actual: &[f64]) -> Result<usize> {
    let n = predicted.len();
    if n == 0 || actual.is_empty() {
        return Err(SimulationError::invalid("input series must not be empty"));
    }
    if actual.len() != n {
        return Err(SimulationError::invalid(format!(
            "predicted length {} != actual length {}",
            n,
            actual.len()
        )));
    }
    if let Some(i) = predicted.iter().skip(1).position(|x| !x.is_finite()) {
        return Err(SimulationError::invalid(format!(
            "predicted contains non-finite value {} at index {}",
            predicted[i + 1],
            i + 1
        )));
    }
    if let Some(i) = actual.iter().position(|x| !x.is_finite()) {
        return Err(SimulationError::invalid(format!(
            "actual contains non-finite value {} at index {}",
            actual[i], i
        )));
    }
    Ok(n)
}
