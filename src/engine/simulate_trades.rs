// src/engine/simulate_trades.rs

use log::trace;

use crate::config::SimulationConfig;
use crate::engine::position::{Position, Trade};
use crate::engine::scan_signals::forecast_side;
use crate::error::Result;

/// Replay the flip strategy over validated, equal-length series.
///
/// Step i compares `predicted[i + 1]` against `actual[i]`; every fill
/// (open, flip, close) happens at `actual[i + 1]`. The last bar only
/// force-closes whatever is still open at `actual[n - 1]`.
pub fn simulate_trades(
    predicted: &[f64],
    actual: &[f64],
    config: &SimulationConfig,
) -> Result<Vec<Trade>> {
    let n = actual.len();
    let mut trades = Vec::new();
    let mut current: Option<Position> = None;
    let mut future_side = None;

    for i in 0..n {
        if i == n - 1 {
            if let Some(pos) = current.take() {
                let trade = pos.close(i, actual[i], config)?;
                trace!("force-close {} at bar {}: profit {}", trade.side.as_str(), i, trade.profit);
                trades.push(trade);
            }
            break;
        }

        future_side = forecast_side(predicted[i + 1], actual[i], future_side);
        let Some(side) = future_side else { continue };

        let fill_index = i + 1;
        let fill_price = actual[fill_index];
        match current {
            Some(pos) if pos.side == side => {}
            Some(pos) => {
                let trade = pos.close(fill_index, fill_price, config)?;
                trace!(
                    "flip {} -> {} at bar {}: profit {}",
                    pos.side.as_str(), side.as_str(), fill_index, trade.profit
                );
                trades.push(trade);
                current = Some(Position::open(side, fill_index, fill_price));
            }
            None => {
                trace!("open {} at bar {} price {}", side.as_str(), fill_index, fill_price);
                current = Some(Position::open(side, fill_index, fill_price));
            }
        }
    }

    Ok(trades)
}
