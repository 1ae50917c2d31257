//! Result-frame assembly.
//!
//! Turns a [`Simulation`] history into the two output tables: a date-indexed
//! portfolio summary and a date-by-instrument position matrix.

use chrono::Datelike;
use polars::prelude::*;

use nerja_traits::{Date, Result};

use crate::engine::Simulation;
use crate::panel::EPOCH_DAYS_FROM_CE;

/// Builds a polars date column from chrono dates.
pub(crate) fn date_column(name: &str, dates: &[Date]) -> Column {
    let days: Vec<i32> = dates
        .iter()
        .map(|d| d.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
        .collect();
    Int32Chunked::from_vec(name.into(), days)
        .into_date()
        .into_series()
        .into()
}

impl Simulation {
    /// Daily simple returns of the portfolio value series. The first entry
    /// is `NaN`, there is no prior value to compare against.
    pub fn daily_returns(&self) -> Vec<f64> {
        let mut returns = Vec::with_capacity(self.portfolio_value.len());
        returns.push(f64::NAN);
        for t in 1..self.portfolio_value.len() {
            returns.push(self.portfolio_value[t] / self.portfolio_value[t - 1] - 1.0);
        }
        returns
    }

    /// Cumulative compounded returns, `NaN` until the first defined daily
    /// return.
    pub fn cumulative_returns(&self) -> Vec<f64> {
        let daily = self.daily_returns();
        let mut cumulative = Vec::with_capacity(daily.len());
        let mut growth = 1.0;
        for (t, r) in daily.iter().enumerate() {
            if t == 0 {
                cumulative.push(f64::NAN);
            } else {
                growth *= 1.0 + r;
                cumulative.push(growth - 1.0);
            }
        }
        cumulative
    }

    /// The date-indexed portfolio summary table.
    ///
    /// Columns: `date`, `portfolio_value`, `cash`, `positions_value`,
    /// `transactions_cost`, `daily_return`, `cumulative_return`.
    pub fn summary(&self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            date_column("date", &self.dates),
            Column::new("portfolio_value".into(), &self.portfolio_value),
            Column::new("cash".into(), &self.cash),
            Column::new("positions_value".into(), &self.positions_value),
            Column::new("transactions_cost".into(), &self.transactions_cost),
            Column::new("daily_return".into(), self.daily_returns()),
            Column::new("cumulative_return".into(), self.cumulative_returns()),
        ])?;
        Ok(df)
    }

    /// The date-by-instrument table of quantities held, one `f64` column
    /// per symbol on the same instrument axis as the input panel.
    pub fn positions_frame(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.symbols.len() + 1);
        columns.push(date_column("date", &self.dates));
        for (i, symbol) in self.symbols.iter().enumerate() {
            let quantities: Vec<f64> = self.positions.column(i).to_vec();
            columns.push(Column::new(symbol.as_str().into(), quantities));
        }
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{SimulationConfig, Simulator};
    use crate::panel::Panel;
    use approx::assert_relative_eq;
    use nerja_traits::TradePanel;

    fn simulation() -> Simulation {
        let df = df! {
            "dt" => &[
                "2024-01-02", "2024-01-02",
                "2024-01-03", "2024-01-03",
                "2024-01-04", "2024-01-04",
            ],
            "symbol" => &["A", "B", "A", "B", "A", "B"],
            "close" => &[10.0, 20.0, 10.0, 22.0, 12.0, 22.0],
            "signal" => &[1.0, 1.0, 1.0, 1.0, 0.0, 1.0],
        }
        .unwrap();
        let panel = Panel::from_trades(&TradePanel::new(df)).unwrap();
        let config = SimulationConfig {
            initial_capital: 10_000.0,
            cost_rate: 0.0,
        };
        Simulator::new(config).run(&panel).unwrap()
    }

    #[test]
    fn test_summary_schema() {
        let sim = simulation();
        let summary = sim.summary().unwrap();
        assert_eq!(summary.height(), 3);
        let names: Vec<&str> = summary
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "date",
                "portfolio_value",
                "cash",
                "positions_value",
                "transactions_cost",
                "daily_return",
                "cumulative_return"
            ]
        );
    }

    #[test]
    fn test_return_arithmetic() {
        let sim = simulation();
        let daily = sim.daily_returns();
        let cumulative = sim.cumulative_returns();

        assert!(daily[0].is_nan());
        assert!(cumulative[0].is_nan());
        for t in 1..3 {
            assert_relative_eq!(
                daily[t],
                sim.portfolio_value[t] / sim.portfolio_value[t - 1] - 1.0
            );
        }
        assert_relative_eq!(
            cumulative[2],
            (1.0 + daily[1]) * (1.0 + daily[2]) - 1.0,
            epsilon = 1e-12
        );
        // Cumulative return ties back to the value series directly.
        assert_relative_eq!(
            cumulative[2],
            sim.portfolio_value[2] / sim.portfolio_value[0] - 1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_positions_frame_schema() {
        let sim = simulation();
        let positions = sim.positions_frame().unwrap();
        assert_eq!(positions.height(), 3);
        let names: Vec<&str> = positions
            .get_column_names()
            .iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(names, ["date", "A", "B"]);

        let a = positions
            .column("A")
            .unwrap()
            .as_materialized_series()
            .f64()
            .unwrap()
            .to_vec();
        assert_eq!(a[0], Some(0.0));
        assert_relative_eq!(a[1].unwrap(), 500.0);
        assert_relative_eq!(a[2].unwrap(), 0.0);
    }
}
