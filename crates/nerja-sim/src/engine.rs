//! Portfolio simulation engine.
//!
//! Reconstructs day-by-day capital allocation under a cash-constrained
//! rebalancing policy. The per-date transition is a pure function of the
//! previous state and one day's prices and signals; [`Simulator::run`]
//! folds it over the sorted date axis in strictly increasing order.
//!
//! # Policy summary
//!
//! - A non-positive aggregate signal disables all trading for that date.
//! - Target weights are `signal / total_signal`, so individual weights may
//!   be negative while the total is positive.
//! - When aggregate buy cost exceeds available cash, every buy-side trade
//!   is scaled by the same factor; sell-side trades always execute in full.

use log::warn;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use nerja_traits::{Date, NerjaError, Result, Symbol};

use crate::panel::Panel;

/// Simulation configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Starting cash balance
    pub initial_capital: f64,
    /// Transaction cost as a fraction of notional traded, applied
    /// symmetrically to buys and sells
    pub cost_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            cost_rate: 0.001,
        }
    }
}

/// Portfolio state threaded through the simulation, one transition per date.
#[derive(Debug, Clone)]
pub struct PortfolioState {
    /// Cash balance. Trading never pushes it negative by construction.
    pub cash: f64,
    /// Quantity held per instrument, aligned with the panel's symbol axis.
    /// Fractional and signed.
    pub positions: Array1<f64>,
}

impl PortfolioState {
    /// Initial condition: all capital in cash, zero positions.
    pub fn with_capital(initial_capital: f64, n_symbols: usize) -> Self {
        Self {
            cash: initial_capital,
            positions: Array1::zeros(n_symbols),
        }
    }

    /// Marked-to-market value of held positions at the given prices.
    pub fn position_value(&self, prices: ArrayView1<'_, f64>) -> f64 {
        self.positions.dot(&prices)
    }
}

/// A guarded division that would have produced NaN/Inf and was substituted
/// with zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneracyKind {
    /// A nonzero allocation ratio landed on an instrument whose price
    /// resolved to zero; its target position value was forced to zero.
    UnpricedAllocation,
    /// The rationing branch was entered with zero aggregate buy cost; the
    /// scale factor was forced to zero.
    ZeroBuyCost,
}

/// A recorded degeneracy: diagnostic, never fatal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Degeneracy {
    /// Date on which the guard fired.
    pub date: Date,
    /// Which guard fired.
    pub kind: DegeneracyKind,
}

/// Outcome of a single date transition.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Committed state after the transition.
    pub state: PortfolioState,
    /// Prices after missing-value resolution, used for marking.
    pub resolved_prices: Array1<f64>,
    /// Total transaction cost incurred on this date.
    pub transaction_cost: f64,
    /// Guards that fired during this transition.
    pub degeneracies: Vec<DegeneracyKind>,
}

/// Computes `state[t]` from `state[t-1]` and a single day's prices and
/// signals. Pure; the leaf algorithmic unit of the engine.
///
/// `prices_yesterday` is the raw (unresolved) previous price row: a missing
/// price today falls back to yesterday's quote, and to zero if that is
/// missing too. A zero-priced instrument cannot be traded into, but a
/// pre-existing quantity in it is retained at zero value.
pub fn step(
    prev: &PortfolioState,
    prices_today: ArrayView1<'_, f64>,
    prices_yesterday: ArrayView1<'_, f64>,
    signals_today: ArrayView1<'_, f64>,
    config: &SimulationConfig,
) -> StepOutcome {
    let n = prices_today.len();
    let mut degeneracies = Vec::new();

    // 1. Price resolution: NaN -> yesterday's quote -> 0.
    let resolved_prices: Array1<f64> = prices_today
        .iter()
        .zip(prices_yesterday.iter())
        .map(|(&today, &yesterday)| {
            if today.is_finite() {
                today
            } else if yesterday.is_finite() {
                yesterday
            } else {
                0.0
            }
        })
        .collect();

    // 2. Mark prior positions at today's resolved prices.
    let prior_value = prev.cash + prev.position_value(resolved_prices.view());

    // 3. Aggregate signal check: non-positive total disables trading. The
    // check is on the aggregate, not per instrument.
    let total_signal: f64 = signals_today.sum();
    if total_signal.is_nan() || total_signal <= 0.0 {
        return StepOutcome {
            state: prev.clone(),
            resolved_prices,
            transaction_cost: 0.0,
            degeneracies,
        };
    }

    // Allocation ratios and target quantities. Individual ratios may be
    // negative even though the total is positive.
    let mut target_positions = Array1::zeros(n);
    let mut unpriced_allocation = false;
    for i in 0..n {
        let ratio = signals_today[i] / total_signal;
        let price = resolved_prices[i];
        if price > 0.0 {
            target_positions[i] = prior_value * ratio / price;
        } else if ratio != 0.0 {
            unpriced_allocation = true;
        }
    }
    if unpriced_allocation {
        degeneracies.push(DegeneracyKind::UnpricedAllocation);
    }

    // 4. Trade sizing.
    let trades = &target_positions - &prev.positions;
    let trade_values: Array1<f64> = trades
        .iter()
        .zip(resolved_prices.iter())
        .map(|(&q, &p)| q.abs() * p)
        .collect();
    let trade_costs: Array1<f64> = trade_values.iter().map(|&v| v * config.cost_rate).collect();

    let mut buy_value = 0.0;
    let mut buy_cost = 0.0;
    let mut sell_value = 0.0;
    let mut sell_cost = 0.0;
    for i in 0..n {
        if trades[i] > 0.0 {
            buy_value += trade_values[i];
            buy_cost += trade_costs[i];
        } else if trades[i] < 0.0 {
            sell_value += trade_values[i];
            sell_cost += trade_costs[i];
        }
    }

    // 5. Cash-constrained execution.
    let total_buy_cost = buy_value + buy_cost;
    let (new_positions, new_cash, transaction_cost) = if total_buy_cost <= prev.cash {
        // Full execution.
        let new_cash = prev.cash - buy_value - buy_cost + sell_value - sell_cost;
        (target_positions, new_cash, buy_cost + sell_cost)
    } else {
        // Proportional rationing: scale every buy by the same factor, no
        // per-instrument priority. Sells execute at full size.
        let scale = if total_buy_cost > 0.0 {
            prev.cash / total_buy_cost
        } else {
            degeneracies.push(DegeneracyKind::ZeroBuyCost);
            0.0
        };

        let mut new_positions = prev.positions.clone();
        let mut scaled_buy_value = 0.0;
        let mut scaled_buy_cost = 0.0;
        for i in 0..n {
            if trades[i] > 0.0 {
                let quantity = trades[i] * scale;
                let value = quantity * resolved_prices[i];
                new_positions[i] += quantity;
                scaled_buy_value += value;
                scaled_buy_cost += value * config.cost_rate;
            } else {
                new_positions[i] += trades[i];
            }
        }

        let new_cash = prev.cash - scaled_buy_value - scaled_buy_cost + sell_value - sell_cost;
        (new_positions, new_cash, scaled_buy_cost + sell_cost)
    };

    // 6. Commit.
    StepOutcome {
        state: PortfolioState {
            cash: new_cash,
            positions: new_positions,
        },
        resolved_prices,
        transaction_cost,
        degeneracies,
    }
}

/// Full history of a simulation run, retained per date.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Configuration the run was produced with.
    pub config: SimulationConfig,
    /// Date axis, sorted ascending.
    pub dates: Vec<Date>,
    /// Instrument axis, matching the input panel.
    pub symbols: Vec<Symbol>,
    /// Portfolio value (cash plus marked positions) per date.
    pub portfolio_value: Vec<f64>,
    /// Cash balance per date.
    pub cash: Vec<f64>,
    /// Marked-to-market position value per date.
    pub positions_value: Vec<f64>,
    /// Transaction cost incurred per date.
    pub transactions_cost: Vec<f64>,
    /// Quantity held per date and instrument.
    pub positions: Array2<f64>,
    /// Guarded divisions that fired during the run.
    pub degeneracies: Vec<Degeneracy>,
}

impl Simulation {
    /// Final portfolio value.
    pub fn final_value(&self) -> f64 {
        self.portfolio_value.last().copied().unwrap_or(f64::NAN)
    }

    /// Sum of transaction costs over the whole run.
    pub fn total_transaction_costs(&self) -> f64 {
        self.transactions_cost.iter().sum()
    }
}

/// Sequential driver folding [`step`] over a panel's date axis.
#[derive(Debug, Default)]
pub struct Simulator {
    config: SimulationConfig,
}

impl Simulator {
    /// Creates a simulator with the given configuration.
    pub const fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Runs the simulation over the panel's full date range.
    ///
    /// The first date is the fixed initial condition (all capital in cash,
    /// zero positions, zero cost) and is not run through the transition.
    /// Degeneracies are recorded and logged but never abort the run; a
    /// non-finite committed cash or portfolio value does, since it means
    /// the guards were insufficient.
    pub fn run(&self, panel: &Panel) -> Result<Simulation> {
        let n_dates = panel.n_dates();
        let n_symbols = panel.n_symbols();
        let prices = panel.prices();
        let signals = panel.signals();

        let mut portfolio_value = vec![0.0; n_dates];
        let mut cash = vec![0.0; n_dates];
        let mut positions_value = vec![0.0; n_dates];
        let mut transactions_cost = vec![0.0; n_dates];
        let mut positions = Array2::zeros((n_dates, n_symbols));
        let mut degeneracies = Vec::new();

        let mut state = PortfolioState::with_capital(self.config.initial_capital, n_symbols);
        cash[0] = state.cash;
        portfolio_value[0] = state.cash;

        for t in 1..n_dates {
            let outcome = step(
                &state,
                prices.row(t),
                prices.row(t - 1),
                signals.row(t),
                &self.config,
            );
            let date = panel.dates()[t];

            for kind in outcome.degeneracies {
                warn!("guarded division substituted with zero on {date}: {kind:?}");
                degeneracies.push(Degeneracy { date, kind });
            }

            state = outcome.state;
            let pos_value = state.position_value(outcome.resolved_prices.view());

            cash[t] = state.cash;
            positions_value[t] = pos_value;
            portfolio_value[t] = state.cash + pos_value;
            transactions_cost[t] = outcome.transaction_cost;
            positions.row_mut(t).assign(&state.positions);

            if !state.cash.is_finite() || !portfolio_value[t].is_finite() {
                return Err(NerjaError::NumericInvariant(format!(
                    "non-finite state committed on {date}: cash={}, portfolio_value={}",
                    state.cash, portfolio_value[t]
                )));
            }
        }

        Ok(Simulation {
            config: self.config,
            dates: panel.dates().to_vec(),
            symbols: panel.symbols().to_vec(),
            portfolio_value,
            cash,
            positions_value,
            transactions_cost,
            positions,
            degeneracies,
        })
    }
}
