//! Cash-constrained daily portfolio simulation for Nerja.
//!
//! This crate reconstructs day-by-day capital allocation from a price series
//! and a per-instrument allocation signal:
//! - Input normalization from long-format trade rows to dense matrices
//! - A sequential, cash-constrained rebalancing state machine
//! - Result-frame assembly (portfolio summary and position history)
//! - Performance metrics and parallel parameter sweeps
//!
//! # Example
//!
//! ```rust,ignore
//! use nerja_sim::{Panel, SimulationConfig, Simulator};
//!
//! let panel = Panel::from_trades(&trades)?;
//! let sim = Simulator::new(SimulationConfig::default()).run(&panel)?;
//! let summary = sim.summary()?;
//! let positions = sim.positions_frame()?;
//! ```

pub mod engine;
pub mod metrics;
pub mod panel;
pub mod report;
pub mod sweep;

// Re-export main types
pub use engine::{
    Degeneracy, DegeneracyKind, PortfolioState, Simulation, SimulationConfig, Simulator,
};
pub use metrics::PerformanceSummary;
pub use panel::Panel;
pub use sweep::{SweepPoint, sweep_cost_rates};
