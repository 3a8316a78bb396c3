// src/python.rs

use ndarray::ArrayViewD;
use numpy::{IntoPyArray, PyReadonlyArrayDyn};
use pyo3::exceptions::{PyOverflowError, PyValueError, PyZeroDivisionError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::config::SimulationConfig;
use crate::engine::{
    self,
    exposure::EquitySnapshot,
    metrics::{SideMetrics, TimeSeriesMetrics},
    position::Trade,
};
use crate::error::SimulationError;

impl From<SimulationError> for PyErr {
    fn from(err: SimulationError) -> PyErr {
        match err {
            SimulationError::InvalidInput(_)      => PyValueError::new_err(err.to_string()),
            SimulationError::DivisionByZero { .. } => PyZeroDivisionError::new_err(err.to_string()),
            SimulationError::NumericOverflow { .. } => PyOverflowError::new_err(err.to_string()),
        }
    }
}

/// Accept 1-D arrays and `(n, 1)` column vectors, which is what
/// scikit-learn and keras `predict` hand back.
fn flatten_prices(name: &str, view: ArrayViewD<'_, f64>) -> PyResult<Vec<f64>> {
    match view.shape() {
        [_] | [_, 1] => Ok(view.iter().copied().collect()),
        shape => Err(PyValueError::new_err(format!(
            "‘{}’ must be 1-D or a single column, got shape {:?}",
            name, shape
        ))),
    }
}

fn read_inputs(
    predicted: &PyReadonlyArrayDyn<'_, f64>,
    actual: &PyReadonlyArrayDyn<'_, f64>,
) -> PyResult<(Vec<f64>, Vec<f64>)> {
    Ok((
        flatten_prices("predicted", predicted.as_array())?,
        flatten_prices("actual", actual.as_array())?,
    ))
}

fn trade_to_py<'py>(py: Python<'py>, trade: &Trade) -> PyResult<&'py PyDict> {
    let d = PyDict::new(py);
    d.set_item("side",        trade.side.as_str())?;
    d.set_item("open_index",  trade.open_index)?;
    d.set_item("close_index", trade.close_index)?;
    d.set_item("open_price",  trade.open_price)?;
    d.set_item("close_price", trade.close_price)?;
    d.set_item("profit",      trade.profit)?;
    Ok(d)
}

fn snapshot_to_py<'py>(py: Python<'py>, snap: &EquitySnapshot) -> PyResult<&'py PyDict> {
    let d = PyDict::new(py);
    d.set_item("index",           snap.index)?;
    d.set_item("price",           snap.price)?;
    d.set_item("exposure",        snap.exposure)?;
    d.set_item("realized_profit", snap.realized_profit)?;
    d.set_item("commission_paid", snap.commission_paid)?;
    d.set_item("floating_profit", snap.floating_profit)?;
    d.set_item("equity",          snap.equity)?;
    Ok(d)
}

fn side_metrics_to_py<'py>(py: Python<'py>, sm: &SideMetrics) -> PyResult<&'py PyDict> {
    let tm = &sm.trade_metrics;
    let d = PyDict::new(py);
    d.set_item("total_profit",     sm.total_profit)?;
    d.set_item("number_of_trades", tm.number_of_trades)?;
    d.set_item("win_rate",         tm.win_rate)?;
    d.set_item("loss_rate",        tm.loss_rate)?;
    d.set_item("average_profit",   tm.average_profit)?;
    d.set_item("gross_wins",       tm.gross_wins)?;
    d.set_item("gross_losses",     tm.gross_losses)?;
    d.set_item("profit_factor",    tm.profit_factor)?;
    d.set_item("average_duration", tm.average_duration)?;
    d.set_item("profits",   PyList::new(py, &tm.profits))?;
    d.set_item("durations", PyList::new(py, &tm.durations))?;
    Ok(d)
}

fn time_metrics_to_py<'py>(py: Python<'py>, tsm: &TimeSeriesMetrics) -> PyResult<&'py PyDict> {
    let d = PyDict::new(py);
    d.set_item("returns",           PyList::new(py, &tsm.returns))?;
    d.set_item("mean_return",       tsm.mean_return)?;
    d.set_item("volatility",        tsm.volatility)?;
    d.set_item("sharpe_ratio",      tsm.sharpe_ratio)?;
    d.set_item("cumulative_return", tsm.cumulative_return)?;
    d.set_item("max_drawdown",      tsm.max_drawdown)?;
    Ok(d)
}

/// Net profit of the flip strategy: gross trade profit minus commission per trade.
#[pyfunction]
#[pyo3(signature = (predicted, actual, commission = 5.0, capital = 1000.0, leverage = 100.0))]
pub fn calculate_total_profit<'py>(
    predicted:  PyReadonlyArrayDyn<'py, f64>,
    actual:     PyReadonlyArrayDyn<'py, f64>,
    commission: f64,
    capital:    f64,
    leverage:   f64,
) -> PyResult<f64> {
    let (p, a) = read_inputs(&predicted, &actual)?;
    let config = SimulationConfig::new(commission, capital, leverage);
    Ok(engine::calculate_total_profit(&p, &a, &config)?)
}

/// Full replay: transactions, trades, equity curve and metrics as a dict.
#[pyfunction]
#[pyo3(signature = (predicted, actual, commission = 5.0, capital = 1000.0, leverage = 100.0))]
pub fn simulate<'py>(
    py:         Python<'py>,
    predicted:  PyReadonlyArrayDyn<'py, f64>,
    actual:     PyReadonlyArrayDyn<'py, f64>,
    commission: f64,
    capital:    f64,
    leverage:   f64,
) -> PyResult<PyObject> {
    let (p, a) = read_inputs(&predicted, &actual)?;
    let config = SimulationConfig::new(commission, capital, leverage);
    let analysis = engine::analyze(&p, &a, &config)?;
    let report = analysis.report;

    let out = PyDict::new(py);
    out.set_item("total_profit",    report.total_profit)?;
    out.set_item("gross_profit",    report.gross_profit)?;
    out.set_item("commission_paid", report.commission_paid)?;

    let py_trades = PyList::empty(py);
    for trade in &report.trades {
        py_trades.append(trade_to_py(py, trade)?)?;
    }
    out.set_item("trades", py_trades)?;

    let py_curve = PyList::empty(py);
    for snap in &analysis.equity_curve {
        py_curve.append(snapshot_to_py(py, snap)?)?;
    }
    out.set_item("equity_curve", py_curve)?;

    let metrics = &analysis.metrics;
    let pm = PyDict::new(py);
    pm.set_item("overall", side_metrics_to_py(py, &metrics.overall)?)?;
    pm.set_item("long",    side_metrics_to_py(py, &metrics.longs)?)?;
    pm.set_item("short",   side_metrics_to_py(py, &metrics.shorts)?)?;
    pm.set_item("time",    time_metrics_to_py(py, &metrics.time_metrics)?)?;
    out.set_item("metrics", pm)?;

    out.set_item("transactions", report.transactions.into_pyarray(py))?;
    Ok(out.into())
}

/// Total profit for each `(commission, capital, leverage)` tuple, computed
/// in parallel without holding the GIL.
#[pyfunction]
pub fn simulate_grid<'py>(
    py:        Python<'py>,
    predicted: PyReadonlyArrayDyn<'py, f64>,
    actual:    PyReadonlyArrayDyn<'py, f64>,
    configs:   Vec<(f64, f64, f64)>,
) -> PyResult<Vec<f64>> {
    let (p, a) = read_inputs(&predicted, &actual)?;
    let configs: Vec<SimulationConfig> = configs
        .into_iter()
        .map(|(commission, capital, leverage)| SimulationConfig::new(commission, capital, leverage))
        .collect();

    let results = py.allow_threads(|| engine::simulate_batch(&p, &a, &configs));
    results
        .into_iter()
        .map(|r| r.map(|report| report.total_profit).map_err(PyErr::from))
        .collect()
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calculate_total_profit, m)?)?;
    m.add_function(wrap_pyfunction!(simulate, m)?)?;
    m.add_function(wrap_pyfunction!(simulate_grid, m)?)?;
    Ok(())
}
