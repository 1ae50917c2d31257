//! Parameter sweeps.
//!
//! A single simulation is strictly sequential, but independent runs are
//! side-effect-free computations over their own state, so sweeping a grid
//! of transaction-cost rates parallelizes across runs with rayon.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use nerja_traits::Result;

use crate::engine::{SimulationConfig, Simulator};
use crate::metrics::PerformanceSummary;
use crate::panel::Panel;

/// Result of one simulation run inside a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Transaction cost rate this run used.
    pub cost_rate: f64,
    /// Final portfolio value.
    pub final_value: f64,
    /// Sum of transaction costs over the run.
    pub total_costs: f64,
    /// Performance summary of the run.
    pub metrics: PerformanceSummary,
}

/// Runs one independent simulation per cost rate, in parallel.
///
/// Points come back in the same order as `cost_rates`. Each run takes its
/// own copy of state; the shared panel is read-only.
pub fn sweep_cost_rates(
    panel: &Panel,
    base: &SimulationConfig,
    cost_rates: &[f64],
) -> Result<Vec<SweepPoint>> {
    cost_rates
        .par_iter()
        .map(|&cost_rate| {
            let config = SimulationConfig {
                cost_rate,
                ..*base
            };
            let sim = Simulator::new(config).run(panel)?;
            Ok(SweepPoint {
                cost_rate,
                final_value: sim.final_value(),
                total_costs: sim.total_transaction_costs(),
                metrics: PerformanceSummary::from_simulation(&sim),
            })
        })
        .collect()
}
