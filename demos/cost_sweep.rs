//! Transaction-cost sensitivity sweep.
//!
//! This example demonstrates:
//! - Running independent simulations across a grid of cost rates
//! - Comparing final values and Sharpe ratios across the grid

use nerja_sim::{sweep_cost_rates, Panel, SimulationConfig};
use nerja_traits::TradePanel;
use polars::prelude::*;

/// Cost rates to sweep, from free execution to 50 basis points.
const COST_RATES: &[f64] = &[0.0, 0.0005, 0.001, 0.002, 0.005];

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    // A deliberately churny allocation: the signal flips between the two
    // instruments every day, so costs bite hard.
    let mut dt = Vec::new();
    let mut symbol = Vec::new();
    let mut close = Vec::new();
    let mut signal = Vec::new();

    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    for t in 0..120 {
        let date = (start + chrono::Duration::days(t)).format("%Y-%m-%d").to_string();
        let flip = t % 2 == 0;
        for (i, sym) in ["AAPL", "MSFT"].iter().enumerate() {
            dt.push(date.clone());
            symbol.push(sym.to_string());
            close.push(100.0 + 10.0 * i as f64 + 0.05 * t as f64);
            signal.push(if (i == 0) == flip { 1.0 } else { 0.0 });
        }
    }

    let df = df! {
        "dt" => dt,
        "symbol" => symbol,
        "close" => close,
        "signal" => signal,
    }?;

    let panel = Panel::from_trades(&TradePanel::new(df))?;
    let base = SimulationConfig {
        initial_capital: 100_000.0,
        ..Default::default()
    };

    let points = sweep_cost_rates(&panel, &base, COST_RATES)?;

    println!("\nTransaction Cost Sweep");
    println!("══════════════════════");
    println!(
        "{:>10} {:>14} {:>12} {:>8}",
        "Cost Rate", "Final Value", "Total Costs", "Sharpe"
    );
    for point in &points {
        println!(
            "{:>10.4} {:>14.2} {:>12.2} {:>8.2}",
            point.cost_rate, point.final_value, point.total_costs, point.metrics.sharpe_ratio
        );
    }

    Ok(())
}
