//! Performance metrics.
//!
//! Read-only summary statistics derived from a completed [`Simulation`]:
//! total and annualized return, volatility, Sharpe ratio, and maximum
//! drawdown. None of these feed back into the state machine.

use serde::{Deserialize, Serialize};

use crate::engine::Simulation;

/// Trading days per year used for annualization.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Performance summary over a simulation's portfolio-value series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Total return over the full date range
    pub total_return: f64,
    /// Annualized return (geometric)
    pub annualized_return: f64,
    /// Annualized volatility of daily returns
    pub annualized_volatility: f64,
    /// Sharpe ratio (annualized, zero risk-free rate)
    pub sharpe_ratio: f64,
    /// Maximum peak-to-trough drawdown of portfolio value
    pub max_drawdown: f64,
    /// Sum of transaction costs over the run
    pub total_transaction_costs: f64,
    /// Number of dates on which any trade executed
    pub n_trading_days: usize,
}

impl PerformanceSummary {
    /// Computes the summary from a completed simulation.
    pub fn from_simulation(sim: &Simulation) -> Self {
        let values = &sim.portfolio_value;
        let daily: Vec<f64> = sim
            .daily_returns()
            .into_iter()
            .filter(|r| r.is_finite())
            .collect();

        let total_return = if values.len() > 1 && values[0] != 0.0 {
            values[values.len() - 1] / values[0] - 1.0
        } else {
            f64::NAN
        };

        let n_years = values.len() as f64 / TRADING_DAYS_PER_YEAR;
        let annualized_return = if n_years > 0.0 && total_return.is_finite() {
            (1.0 + total_return).powf(1.0 / n_years) - 1.0
        } else {
            f64::NAN
        };

        let (annualized_volatility, sharpe_ratio) = sharpe(&daily);

        Self {
            total_return,
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            max_drawdown: max_drawdown(values),
            total_transaction_costs: sim.total_transaction_costs(),
            n_trading_days: sim.transactions_cost.iter().filter(|&&c| c > 0.0).count(),
        }
    }
}

/// Annualized volatility and Sharpe ratio of a daily return series.
fn sharpe(returns: &[f64]) -> (f64, f64) {
    if returns.len() < 2 {
        return (f64::NAN, f64::NAN);
    }

    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()
        / (returns.len() - 1) as f64;
    let std = variance.sqrt();

    let volatility = std * TRADING_DAYS_PER_YEAR.sqrt();
    let sharpe = if std == 0.0 {
        f64::NAN
    } else {
        mean / std * TRADING_DAYS_PER_YEAR.sqrt()
    };
    (volatility, sharpe)
}

/// Maximum peak-to-trough drawdown of a value series.
fn max_drawdown(values: &[f64]) -> f64 {
    let mut max_dd = 0.0;
    let mut peak = f64::MIN;

    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let dd = (peak - value) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}
