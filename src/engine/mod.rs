// src/engine/mod.rs

pub mod position;
pub mod prepare_inputs;
pub mod scan_signals;
pub mod simulate_trades;
pub mod exposure;
pub mod metrics;

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::config::SimulationConfig;
use crate::engine::{
    exposure::{compute_equity_curve, EquitySnapshot},
    metrics::{compute_summary_metrics, SummaryMetrics},
    position::Trade,
    prepare_inputs::prepare_inputs,
    simulate_trades::simulate_trades,
};
use crate::error::{Result, SimulationError};

/// Outcome of one replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub trades:          Vec<Trade>,
    /// Realized gross profit per trade, in close order.
    pub transactions:    Vec<f64>,
    pub gross_profit:    f64,
    pub commission_paid: f64,
    /// `sum(transactions) - commission * len(transactions)`
    pub total_profit:    f64,
}

/// Report plus the bar-by-bar equity curve and summary metrics.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub report:       SimulationReport,
    pub equity_curve: Vec<EquitySnapshot>,
    pub metrics:      SummaryMetrics,
}

/// Replay the long/short flip strategy driven by `predicted` over `actual`.
///
/// `predicted[i + 1]` is the forecast made at bar `i`; it is compared with
/// `actual[i]` to pick the side, and positions are filled at `actual[i + 1]`.
/// Pure: the same inputs always give the same report.
pub fn simulate(predicted: &[f64], actual: &[f64], config: &SimulationConfig) -> Result<SimulationReport> {
    config.validate()?;
    let n = prepare_inputs(predicted, actual)?;
    debug!("simulating {} bars with {:?}", n, config);

    let trades = simulate_trades(predicted, actual, config)?;
    let transactions: Vec<f64> = trades.iter().map(|t| t.profit).collect();

    let gross_profit: f64 = transactions.iter().sum();
    let commission_paid = config.commission * transactions.len() as f64;
    let total_profit = gross_profit - commission_paid;
    if !gross_profit.is_finite() || !total_profit.is_finite() {
        return Err(SimulationError::NumericOverflow { index: n - 1 });
    }

    debug!(
        "simulation done: {} trades, gross {}, total {}",
        trades.len(), gross_profit, total_profit
    );
    Ok(SimulationReport {
        trades,
        transactions,
        gross_profit,
        commission_paid,
        total_profit,
    })
}

/// Net profit of the strategy; shorthand for `simulate(..)?.total_profit`.
pub fn calculate_total_profit(predicted: &[f64], actual: &[f64], config: &SimulationConfig) -> Result<f64> {
    simulate(predicted, actual, config).map(|report| report.total_profit)
}

pub fn analyze(predicted: &[f64], actual: &[f64], config: &SimulationConfig) -> Result<Analysis> {
    let report = simulate(predicted, actual, config)?;
    let equity_curve = compute_equity_curve(&report.trades, actual, config)?;
    let metrics = compute_summary_metrics(&report.trades, &equity_curve);
    Ok(Analysis {
        report,
        equity_curve,
        metrics,
    })
}

/// Run one independent simulation per config in parallel. Results come
/// back in the order of `configs`; a failing config does not affect the
/// others.
pub fn simulate_batch(
    predicted: &[f64],
    actual: &[f64],
    configs: &[SimulationConfig],
) -> Vec<Result<SimulationReport>> {
    debug!("simulating batch of {} configs", configs.len());
    configs
        .par_iter()
        .map(|config| simulate(predicted, actual, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_totals_are_consistent() {
        let cfg = SimulationConfig::default();
        let report = simulate(&[0.0, 11.0, 9.0], &[10.0, 10.0, 8.0], &cfg).unwrap();
        assert_eq!(report.transactions, vec![-20_000.0, 0.0]);
        assert_eq!(report.gross_profit, -20_000.0);
        assert_eq!(report.commission_paid, 10.0);
        assert_eq!(report.total_profit, -20_010.0);
    }

    #[test]
    fn invalid_config_is_rejected_before_replay() {
        let cfg = SimulationConfig::default().with_capital(0.0);
        assert!(matches!(
            simulate(&[1.0, 2.0], &[1.0, 2.0], &cfg),
            Err(SimulationError::InvalidInput(_))
        ));
    }

    #[test]
    fn analysis_final_equity_matches_total() {
        let cfg = SimulationConfig::default();
        let analysis = analyze(&[0.0, 11.0, 9.0], &[10.0, 10.0, 8.0], &cfg).unwrap();
        let last = analysis.equity_curve.last().unwrap();
        assert_eq!(last.equity, cfg.capital + analysis.report.total_profit);
        assert_eq!(analysis.metrics.overall.trade_metrics.number_of_trades, 2);
    }

    #[test]
    fn gross_sum_overflow_is_numeric_overflow() {
        // long 1 -> 2.5 realizes 1.5e308, short 2.5 -> 0.25 realizes 9e307;
        // each is finite, their sum is not
        let cfg = SimulationConfig::new(0.0, 1e154, 1e154);
        let predicted = [0.0, 2.0, 0.5, 0.5];
        let actual = [1.0, 1.0, 2.5, 0.25];
        let trades = simulate_trades(&predicted, &actual, &cfg).unwrap();
        assert_eq!(trades.len(), 2);
        assert!(trades.iter().all(|t| t.profit.is_finite()));

        assert_eq!(
            simulate(&predicted, &actual, &cfg),
            Err(SimulationError::NumericOverflow { index: 3 })
        );
    }

    #[test]
    fn total_after_commission_overflow_is_numeric_overflow() {
        // one long 1 -> 0 loses 1e308, commission pushes the total past -f64::MAX
        let cfg = SimulationConfig::new(1e308, 1e154, 1e154);
        let predicted = [0.0, 2.0, 2.0];
        let actual = [1.0, 1.0, 0.0];
        assert_eq!(
            simulate(&predicted, &actual, &cfg),
            Err(SimulationError::NumericOverflow { index: 2 })
        );
    }

    #[test]
    fn batch_preserves_order_and_isolates_errors() {
        let configs = [
            SimulationConfig::default(),
            SimulationConfig::default().with_leverage(0.0),
            SimulationConfig::default().with_commission(0.0),
        ];
        let results = simulate_batch(&[1.0, 2.0], &[10.0, 12.0], &configs);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().total_profit, -5.0);
        assert!(results[1].is_err());
        assert_eq!(results[2].as_ref().unwrap().total_profit, 0.0);
    }
}
