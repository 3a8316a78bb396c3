use ndarray::Array1;
use serde::Serialize;

use crate::engine::exposure::EquitySnapshot;
use crate::engine::position::{Side, Trade};

/// Per-trade metrics on gross profit (commission shows up in the equity curve)
#[derive(Debug, Clone, Serialize)]
pub struct SideTradeMetrics {
    pub number_of_trades: usize,
    pub win_rate:         f64,
    pub loss_rate:        f64,
    pub average_profit:   f64,
    pub gross_wins:       f64,
    pub gross_losses:     f64,
    /// `None` without trades, `+inf` with trades but no losses.
    pub profit_factor:    Option<f64>,
    pub average_duration: f64,
    pub profits:          Vec<f64>,
    pub durations:        Vec<f64>,
}

/// Bar-by-bar portfolio metrics
#[derive(Debug, Clone, Serialize)]
pub struct TimeSeriesMetrics {
    pub returns:           Vec<f64>, // R_t per bar
    pub mean_return:       f64,
    pub volatility:        f64,
    pub sharpe_ratio:      f64,
    pub cumulative_return: f64,
    pub max_drawdown:      f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SideMetrics {
    pub total_profit:  f64,
    pub trade_metrics: SideTradeMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryMetrics {
    pub overall:      SideMetrics,
    pub longs:        SideMetrics,
    pub shorts:       SideMetrics,
    pub time_metrics: TimeSeriesMetrics,
}

fn compute_trade_metrics<'a>(trades: impl Iterator<Item = &'a Trade>) -> SideTradeMetrics {
    let mut profits    = Vec::new();
    let mut durations  = Vec::new();
    let mut sum_wins   = 0.0_f64;
    let mut sum_losses = 0.0_f64;
    let mut wins       = 0;
    let mut losses     = 0;

    for trade in trades {
        profits.push(trade.profit);
        durations.push(trade.duration() as f64);

        if trade.profit > 0.0 {
            sum_wins += trade.profit;
            wins += 1;
        } else if trade.profit < 0.0 {
            sum_losses += -trade.profit;
            losses += 1;
        }
    }

    let n  = profits.len();
    let nf = n as f64;
    let (win_rate, loss_rate, average_profit, average_duration) = if n > 0 {
        (
            wins as f64 / nf,
            losses as f64 / nf,
            profits.iter().sum::<f64>() / nf,
            durations.iter().sum::<f64>() / nf,
        )
    } else {
        (0.0, 0.0, 0.0, 0.0)
    };
    let profit_factor = match (n, sum_losses > 0.0) {
        (0, _)    => None,
        (_, true) => Some(sum_wins / sum_losses),
        _         => Some(f64::INFINITY),
    };

    SideTradeMetrics {
        number_of_trades: n,
        win_rate,
        loss_rate,
        average_profit,
        gross_wins: sum_wins,
        gross_losses: sum_losses,
        profit_factor,
        average_duration,
        profits,
        durations,
    }
}

fn compute_time_metrics(curve: &[EquitySnapshot]) -> TimeSeriesMetrics {
    let returns: Vec<f64> = curve
        .windows(2)
        .map(|w| {
            let prev = w[0].equity;
            if prev != 0.0 { (w[1].equity - prev) / prev } else { 0.0 }
        })
        .collect();

    let series = Array1::from_vec(returns.clone());
    let mean_return = series.mean().unwrap_or(0.0);
    let volatility  = if series.len() > 1 { series.std(1.0) } else { 0.0 };
    let sharpe_ratio = if volatility != 0.0 { mean_return / volatility } else { 0.0 };

    let (first, last) = match (curve.first(), curve.last()) {
        (Some(first), Some(last)) => (first.equity, last.equity),
        _ => (0.0, 0.0),
    };
    let cumulative_return = if first != 0.0 { last / first - 1.0 } else { 0.0 };

    // max drawdown
    let mut peak   = first;
    let mut max_dd = 0.0_f64;
    for snap in curve {
        peak = peak.max(snap.equity);
        let dd = if peak > 0.0 { (peak - snap.equity) / peak } else { 0.0 };
        max_dd = max_dd.max(dd);
    }

    TimeSeriesMetrics {
        returns,
        mean_return,
        volatility,
        sharpe_ratio,
        cumulative_return,
        max_drawdown: max_dd,
    }
}

/// Trade metrics for all trades, longs and shorts, plus the equity-curve
/// statistics shared by all three.
pub fn compute_summary_metrics(trades: &[Trade], curve: &[EquitySnapshot]) -> SummaryMetrics {
    let side_metrics = |only: Option<Side>| {
        let trade_metrics = compute_trade_metrics(
            trades.iter().filter(|t| only.map_or(true, |side| t.side == side)),
        );
        SideMetrics {
            total_profit: trade_metrics.profits.iter().sum(),
            trade_metrics,
        }
    };

    SummaryMetrics {
        overall:      side_metrics(None),
        longs:        side_metrics(Some(Side::Long)),
        shorts:       side_metrics(Some(Side::Short)),
        time_metrics: compute_time_metrics(curve),
    }
}
