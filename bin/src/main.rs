//! Nerja CLI binary.
//!
//! Provides the command-line interface for the Nerja portfolio simulator.

mod data;

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use nerja_sim::{
    sweep_cost_rates, Panel, PerformanceSummary, Simulation, SimulationConfig, Simulator,
};

#[derive(Parser)]
#[command(name = "nerja")]
#[command(about = "Cash-constrained daily portfolio simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a portfolio simulation over a trade table
    Simulate {
        /// Input trade table (parquet or csv) with dt, symbol, close, signal
        input: PathBuf,

        /// Directory for output tables (portfolio.parquet, positions.parquet)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Starting cash
        #[arg(long, default_value = "10000.0")]
        initial_capital: f64,

        /// Proportional transaction cost rate
        #[arg(long, default_value = "0.001")]
        cost_rate: f64,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Sweep transaction cost rates over the same trade table
    Sweep {
        /// Input trade table (parquet or csv) with dt, symbol, close, signal
        input: PathBuf,

        /// Cost rates to sweep
        #[arg(short, long, value_delimiter = ',', default_value = "0.0,0.0005,0.001,0.002,0.005")]
        cost_rates: Vec<f64>,

        /// Starting cash
        #[arg(long, default_value = "10000.0")]
        initial_capital: f64,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            input,
            output_dir,
            initial_capital,
            cost_rate,
            format,
        } => {
            run_simulate(&input, output_dir, initial_capital, cost_rate, &format)?;
        }
        Commands::Sweep {
            input,
            cost_rates,
            initial_capital,
        } => {
            run_sweep(&input, &cost_rates, initial_capital)?;
        }
    }

    Ok(())
}

fn run_simulate(
    input: &std::path::Path,
    output_dir: Option<PathBuf>,
    initial_capital: f64,
    cost_rate: f64,
    format: &str,
) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Portfolio Simulation                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Input:    {}", input.display());
    println!("Capital:  {:.2}", initial_capital);
    println!("Cost:     {:.4}", cost_rate);
    println!();

    let trades = data::load_trades(input)?;
    let panel = Panel::from_trades(&trades)?;

    println!(
        "Loaded {} dates x {} symbols",
        panel.n_dates(),
        panel.n_symbols()
    );
    println!();

    let config = SimulationConfig {
        initial_capital,
        cost_rate,
    };
    let sim = Simulator::new(config).run(&panel)?;
    let summary = PerformanceSummary::from_simulation(&sim);

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("SIMULATION RESULTS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    if format == "json" {
        let json = serde_json::to_string_pretty(&summary)?;
        println!("{}", json);
    } else {
        print_summary(&sim, &summary);
    }

    if let Some(dir) = output_dir {
        std::fs::create_dir_all(&dir)?;

        let mut portfolio = sim.summary()?;
        let portfolio_path = dir.join("portfolio.parquet");
        data::write_parquet(&mut portfolio, &portfolio_path)?;

        let mut positions = sim.positions_frame()?;
        let positions_path = dir.join("positions.parquet");
        data::write_parquet(&mut positions, &positions_path)?;

        println!("Wrote {}", portfolio_path.display());
        println!("Wrote {}", positions_path.display());
        println!();
    }

    Ok(())
}

fn print_summary(sim: &Simulation, summary: &PerformanceSummary) {
    println!("Performance Metrics:");
    println!(
        "  Total Return:      {:>10.2}%",
        summary.total_return * 100.0
    );
    println!(
        "  Annualized Return: {:>10.2}%",
        summary.annualized_return * 100.0
    );
    println!(
        "  Annualized Vol:    {:>10.2}%",
        summary.annualized_volatility * 100.0
    );
    println!("  Sharpe Ratio:      {:>10.2}", summary.sharpe_ratio);
    println!(
        "  Max Drawdown:      {:>10.2}%",
        summary.max_drawdown * 100.0
    );
    println!();

    println!("Portfolio:");
    println!("  Final Value:       {:>12.2}", sim.final_value());
    println!(
        "  Final Cash:        {:>12.2}",
        sim.cash.last().copied().unwrap_or(f64::NAN)
    );
    println!(
        "  Total Txn Costs:   {:>12.2}",
        summary.total_transaction_costs
    );
    println!("  Trading Days:      {:>12}", summary.n_trading_days);

    if !sim.degeneracies.is_empty() {
        println!();
        println!("Degeneracies ({} recorded):", sim.degeneracies.len());
        for d in sim.degeneracies.iter().take(10) {
            println!("  {} {:?}", d.date, d.kind);
        }
        if sim.degeneracies.len() > 10 {
            println!("  ... and {} more", sim.degeneracies.len() - 10);
        }
    }
    println!();
}

fn run_sweep(input: &std::path::Path, cost_rates: &[f64], initial_capital: f64) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                  Transaction Cost Sweep                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("Input:    {}", input.display());
    println!("Capital:  {:.2}", initial_capital);
    println!(
        "Rates:    {}",
        cost_rates
            .iter()
            .map(|r| format!("{:.4}", r))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    let trades = data::load_trades(input)?;
    let panel = Panel::from_trades(&trades)?;

    println!(
        "Loaded {} dates x {} symbols",
        panel.n_dates(),
        panel.n_symbols()
    );
    println!();

    let base = SimulationConfig {
        initial_capital,
        ..Default::default()
    };
    let points = sweep_cost_rates(&panel, &base, cost_rates)?;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("SWEEP RESULTS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    println!(
        "{:>10} {:>14} {:>12} {:>10} {:>10}",
        "Cost Rate", "Final Value", "Total Costs", "Return", "Sharpe"
    );
    println!("{}", "─".repeat(60));

    for point in &points {
        println!(
            "{:>10.4} {:>14.2} {:>12.2} {:>9.2}% {:>10.2}",
            point.cost_rate,
            point.final_value,
            point.total_costs,
            point.metrics.total_return * 100.0,
            point.metrics.sharpe_ratio
        );
    }
    println!();

    Ok(())
}
