//! Cash-constrained simulation of a simple momentum allocation.
//!
//! This example demonstrates:
//! - Building a long-format trade table with synthetic prices
//! - Deriving a momentum signal from trailing returns
//! - Running the simulator and reading the output tables
//! - Computing performance metrics (returns, Sharpe, drawdown)

use nerja_sim::{Panel, PerformanceSummary, SimulationConfig, Simulator};
use nerja_traits::TradePanel;
use polars::prelude::*;

/// Instrument universe to simulate.
const UNIVERSE: &[&str] = &["AAPL", "MSFT", "GOOGL", "AMZN"];

/// Number of trading days of synthetic history.
const N_DAYS: usize = 252;

/// Momentum lookback in trading days (approx 1 month).
const MOMENTUM_DAYS: usize = 21;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // Build synthetic daily closes: deterministic drift plus a cyclical
    // wobble, different per instrument so the signal actually rotates.
    let mut closes: Vec<Vec<f64>> = Vec::with_capacity(UNIVERSE.len());
    for (i, _) in UNIVERSE.iter().enumerate() {
        let base = 50.0 + 40.0 * i as f64;
        let drift = 0.0002 + 0.0003 * i as f64;
        let mut series = Vec::with_capacity(N_DAYS);
        let mut price = base;
        for t in 0..N_DAYS {
            let wobble = 0.01 * ((t as f64 / (15.0 + 5.0 * i as f64)).sin());
            price *= 1.0 + drift + wobble;
            series.push(price);
        }
        closes.push(series);
    }

    // Long-format rows: trailing-return momentum as the signal, clamped at
    // zero so only positive-momentum instruments receive allocations.
    let mut dt = Vec::new();
    let mut symbol = Vec::new();
    let mut close = Vec::new();
    let mut signal = Vec::new();

    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    for t in MOMENTUM_DAYS..N_DAYS {
        let date = start + chrono::Duration::days(t as i64);
        for (i, sym) in UNIVERSE.iter().enumerate() {
            let momentum = closes[i][t] / closes[i][t - MOMENTUM_DAYS] - 1.0;
            dt.push(date.format("%Y-%m-%d").to_string());
            symbol.push(sym.to_string());
            close.push(closes[i][t]);
            signal.push(momentum.max(0.0));
        }
    }

    let df = df! {
        "dt" => dt,
        "symbol" => symbol,
        "close" => close,
        "signal" => signal,
    }?;

    // Run the simulation.
    let panel = Panel::from_trades(&TradePanel::new(df))?;
    let config = SimulationConfig {
        initial_capital: 100_000.0,
        cost_rate: 0.001,
    };
    let sim = Simulator::new(config).run(&panel)?;
    let summary = PerformanceSummary::from_simulation(&sim);

    println!("\nMomentum Simulation ({}D lookback)", MOMENTUM_DAYS);
    println!("══════════════════════════════════");
    println!(
        "Period:     {} to {}",
        sim.dates.first().unwrap(),
        sim.dates.last().unwrap()
    );
    println!("Universe:   {} instruments", UNIVERSE.len());
    println!();
    println!("Performance:");
    println!("  Total Return:    {:+.1}%", summary.total_return * 100.0);
    println!("  Sharpe Ratio:    {:.2}", summary.sharpe_ratio);
    println!("  Max Drawdown:    {:.1}%", summary.max_drawdown * 100.0);
    println!("  Final Value:     {:.2}", sim.final_value());
    println!("  Txn Costs:       {:.2}", sim.total_transaction_costs());

    // The output tables are regular polars frames.
    let portfolio = sim.summary()?;
    println!();
    println!("{}", portfolio.tail(Some(5)));

    Ok(())
}
