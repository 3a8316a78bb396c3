// src/engine/exposure.rs

use serde::Serialize;

use crate::config::SimulationConfig;
use crate::engine::position::{Position, Trade};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EquitySnapshot {
    pub index:           usize,
    pub price:           f64,  // actual price at this bar
    pub exposure:        f64,  // signed notional: +long, -short, 0 when flat
    pub realized_profit: f64,  // gross profit of trades closed so far
    pub commission_paid: f64,  // commission × trades closed so far
    pub floating_profit: f64,  // mark-to-market of the open position
    pub equity:          f64,  // capital + realized - commission + floating
}

/// Mark the replay to market on every bar.
///
/// `trades` must be in close order, as produced by the replay. A trade
/// counts as realized from its close bar on; it floats on bars
/// `open_index..close_index`.
pub fn compute_equity_curve(
    trades: &[Trade],
    actual: &[f64],
    config: &SimulationConfig,
) -> Result<Vec<EquitySnapshot>> {
    let mut snapshots = Vec::with_capacity(actual.len());
    let mut realized  = 0.0;
    let mut closed    = 0usize;
    let mut next      = 0usize;

    for (j, &price) in actual.iter().enumerate() {
        // 1) Realize everything that closed on or before this bar
        while let Some(trade) = trades.get(next).filter(|t| t.close_index <= j) {
            realized += trade.profit;
            closed   += 1;
            next     += 1;
        }

        // 2) At most one position is live at a time
        let (exposure, floating) = match trades.get(next).filter(|t| t.open_index <= j) {
            Some(trade) => {
                let pos = Position::open(trade.side, trade.open_index, trade.open_price);
                (trade.side.sign() * config.notional(), pos.profit_at(price, j, config)?)
            }
            None => (0.0, 0.0),
        };

        let commission_paid = config.commission * closed as f64;
        snapshots.push(EquitySnapshot {
            index:           j,
            price,
            exposure,
            realized_profit: realized,
            commission_paid,
            floating_profit: floating,
            equity:          config.capital + realized - commission_paid + floating,
        });
    }

    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::position::Side;

    fn trade(side: Side, open_index: usize, close_index: usize, open_price: f64, close_price: f64, profit: f64) -> Trade {
        Trade { side, open_index, close_index, open_price, close_price, profit }
    }

    #[test]
    fn flat_run_keeps_capital() {
        let cfg = SimulationConfig::default();
        let curve = compute_equity_curve(&[], &[1.0, 1.1, 1.2], &cfg).unwrap();
        assert_eq!(curve.len(), 3);
        assert!(curve.iter().all(|s| s.equity == 1000.0 && s.exposure == 0.0));
    }

    #[test]
    fn floating_then_realized() {
        let cfg = SimulationConfig::default().with_commission(5.0);
        let actual = [100.0, 100.0, 110.0, 120.0];
        let trades = [trade(Side::Long, 1, 3, 100.0, 120.0, 20_000.0)];
        let curve = compute_equity_curve(&trades, &actual, &cfg).unwrap();

        assert_eq!(curve[0].exposure, 0.0);
        assert_eq!(curve[1].exposure, 100_000.0);
        assert_eq!(curve[1].floating_profit, 0.0);
        assert_eq!(curve[2].floating_profit, 10_000.0);
        assert_eq!(curve[2].equity, 11_000.0);

        let last = &curve[3];
        assert_eq!(last.exposure, 0.0);
        assert_eq!(last.floating_profit, 0.0);
        assert_eq!(last.realized_profit, 20_000.0);
        assert_eq!(last.commission_paid, 5.0);
        assert_eq!(last.equity, 1000.0 + 20_000.0 - 5.0);
    }

    #[test]
    fn short_exposure_is_negative() {
        let cfg = SimulationConfig::default();
        let actual = [100.0, 100.0, 90.0];
        let trades = [trade(Side::Short, 1, 2, 100.0, 90.0, 10_000.0)];
        let curve = compute_equity_curve(&trades, &actual, &cfg).unwrap();
        assert_eq!(curve[1].exposure, -100_000.0);
        assert_eq!(curve[2].realized_profit, 10_000.0);
    }
}
