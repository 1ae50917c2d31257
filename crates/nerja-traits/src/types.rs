//! Common types used throughout the Nerja workspace.
//!
//! This module defines the core data types for representing the long-format
//! trade table consumed by the simulator, along with date and symbol aliases.

use polars::prelude::*;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier.
///
/// Symbols identify tradable instruments across the Nerja workspace,
/// typically ticker symbols like "AAPL" or "MSFT".
pub type Symbol = String;

/// Container for the long-format trade table.
///
/// `TradePanel` wraps a Polars DataFrame holding one row per
/// `(date, instrument)` observation. This is the external interface of the
/// simulator: upstream ETL produces it, the input normalizer pivots it into
/// dense date-by-instrument matrices.
///
/// # Expected Schema
///
/// The DataFrame must contain at minimum:
/// - `dt`: trading date (`Date`, `Datetime`, or `%Y-%m-%d` strings)
/// - `symbol`: instrument identifier
/// - `close`: price used both for trading decisions and position marking
/// - `signal`: real-valued allocation strength
///
/// # Example
///
/// ```no_run
/// use nerja_traits::TradePanel;
/// use polars::prelude::*;
///
/// let df = df! {
///     "dt" => &["2024-01-02", "2024-01-02"],
///     "symbol" => &["AAPL", "MSFT"],
///     "close" => &[185.0, 370.0],
///     "signal" => &[0.4, 0.6],
/// }.unwrap();
///
/// let panel = TradePanel::new(df);
/// ```
#[derive(Debug, Clone)]
pub struct TradePanel {
    /// The underlying DataFrame of trade rows.
    data: DataFrame,
}

/// Column names required in a [`TradePanel`].
pub const REQUIRED_COLUMNS: [&str; 4] = ["dt", "symbol", "close", "signal"];

impl TradePanel {
    /// Creates a new `TradePanel` from a DataFrame.
    ///
    /// No validation happens here; the input normalizer checks the schema
    /// before the first simulation step.
    pub const fn new(data: DataFrame) -> Self {
        Self { data }
    }

    /// Returns a reference to the underlying DataFrame.
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes self and returns the underlying DataFrame.
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Returns the number of rows in the panel.
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether the panel is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Checks if a column exists in the panel.
    pub fn has_column(&self, name: &str) -> bool {
        self.data
            .get_column_names()
            .iter()
            .any(|s| s.as_str() == name)
    }

    /// Returns the name of the first required column absent from the
    /// panel, if any.
    pub fn missing_required_column(&self) -> Option<&'static str> {
        REQUIRED_COLUMNS.iter().copied().find(|c| !self.has_column(c))
    }
}

impl From<DataFrame> for TradePanel {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}

impl AsRef<DataFrame> for TradePanel {
    fn as_ref(&self) -> &DataFrame {
        &self.data
    }
}
