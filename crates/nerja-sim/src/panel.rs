//! Input normalization.
//!
//! Converts the long-format trade table (one row per `(date, instrument)`
//! observation) into a dense date-by-instrument [`Panel`]: a price matrix
//! with `NaN` marking missing quotes, and a signal matrix with missing
//! entries filled with zero.

use std::collections::{BTreeSet, HashMap};

use chrono::Datelike;
use ndarray::{Array2, ArrayView2};
use polars::prelude::*;

use nerja_traits::{Date, NerjaError, Result, Symbol, TradePanel};

/// Days between the Common Era and the Unix epoch; polars stores dates as
/// days since the epoch.
pub(crate) const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Dense date-by-instrument view of a trade table.
///
/// The date axis is the sorted, de-duplicated union of all dates present in
/// the input; the instrument axis is the sorted, de-duplicated union of all
/// symbols. Missing price cells are `NaN` and are resolved at transition
/// time by the engine; missing signal cells are `0.0` (no allocation).
///
/// Duplicate `(date, symbol)` pairs resolve to the last occurrence in row
/// order. This is a documented policy, not silent aggregation: upstream is
/// expected to de-duplicate, and when it does not, the most recent row wins
/// deterministically.
#[derive(Debug, Clone)]
pub struct Panel {
    dates: Vec<Date>,
    symbols: Vec<Symbol>,
    symbol_index: HashMap<Symbol, usize>,
    prices: Array2<f64>,
    signals: Array2<f64>,
}

impl Panel {
    /// Builds a panel from a long-format trade table.
    ///
    /// Fails fast, before any simulation step, when a required column
    /// (`dt`, `symbol`, `close`, `signal`) is absent or when the table is
    /// empty so that no axis can be constructed.
    ///
    /// The `dt` column may be a polars `Date`, `Datetime`, or `%Y-%m-%d`
    /// string column.
    pub fn from_trades(trades: &TradePanel) -> Result<Self> {
        if let Some(column) = trades.missing_required_column() {
            return Err(NerjaError::MissingColumn(column.to_string()));
        }
        if trades.is_empty() {
            return Err(NerjaError::MalformedInput(
                "empty trade table, cannot construct date and instrument axes".to_string(),
            ));
        }

        let df = trades.data();
        let row_dates = extract_dates(df.column("dt")?)?;
        let row_symbols = extract_symbols(df.column("symbol")?)?;
        let row_prices = extract_f64(df.column("close")?)?;
        let row_signals = extract_f64(df.column("signal")?)?;

        let dates: Vec<Date> = row_dates.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let symbols: Vec<Symbol> = row_symbols
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let date_index: HashMap<Date, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
        let symbol_index: HashMap<Symbol, usize> = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();

        let mut prices = Array2::from_elem((dates.len(), symbols.len()), f64::NAN);
        let mut signals = Array2::zeros((dates.len(), symbols.len()));

        // Row order is preserved so duplicate pairs overwrite: last wins.
        for (((date, symbol), price), signal) in row_dates
            .iter()
            .zip(row_symbols.iter())
            .zip(row_prices.iter())
            .zip(row_signals.iter())
        {
            let t = date_index[date];
            let i = symbol_index[symbol];
            prices[[t, i]] = price.unwrap_or(f64::NAN);
            // Missing or non-finite signal means no allocation.
            signals[[t, i]] = match signal {
                Some(s) if s.is_finite() => *s,
                _ => 0.0,
            };
        }

        Ok(Self {
            dates,
            symbols,
            symbol_index,
            prices,
            signals,
        })
    }

    /// The sorted date axis.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// The sorted instrument axis.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of dates in the panel.
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of instruments in the panel.
    pub fn n_symbols(&self) -> usize {
        self.symbols.len()
    }

    /// Column index of a symbol, if present.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.symbol_index.get(symbol).copied()
    }

    /// The dense price matrix (dates x instruments), `NaN` where missing.
    pub fn prices(&self) -> ArrayView2<'_, f64> {
        self.prices.view()
    }

    /// The dense signal matrix (dates x instruments), `0.0` where missing.
    pub fn signals(&self) -> ArrayView2<'_, f64> {
        self.signals.view()
    }
}

fn extract_dates(column: &Column) -> Result<Vec<Date>> {
    let series = column.as_materialized_series();

    if let Ok(dates) = series.date() {
        return dates
            .into_iter()
            .map(|d: Option<i32>| {
                d.and_then(|days| Date::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE))
                    .ok_or_else(|| NerjaError::InvalidDate("null date in dt column".to_string()))
            })
            .collect();
    }

    if let Ok(datetimes) = series.datetime() {
        return datetimes
            .into_iter()
            .map(|d: Option<i64>| {
                d.and_then(|ts| chrono::DateTime::from_timestamp_millis(ts))
                    .map(|dt| dt.date_naive())
                    .ok_or_else(|| NerjaError::InvalidDate("null date in dt column".to_string()))
            })
            .collect();
    }

    if let Ok(strings) = series.str() {
        return strings
            .into_iter()
            .map(|s: Option<&str>| {
                let s = s.ok_or_else(|| {
                    NerjaError::InvalidDate("null date in dt column".to_string())
                })?;
                Date::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| NerjaError::InvalidDate(s.to_string()))
            })
            .collect();
    }

    Err(NerjaError::MalformedInput(format!(
        "dt column has unsupported dtype {}",
        series.dtype()
    )))
}

fn extract_symbols(column: &Column) -> Result<Vec<Symbol>> {
    let series = column.as_materialized_series();
    let strings = series.str().map_err(|_| {
        NerjaError::MalformedInput(format!(
            "symbol column has unsupported dtype {}",
            series.dtype()
        ))
    })?;
    strings
        .into_iter()
        .map(|s: Option<&str>| {
            s.map(|x| x.to_string()).ok_or_else(|| {
                NerjaError::MalformedInput("null symbol in symbol column".to_string())
            })
        })
        .collect()
}

fn extract_f64(column: &Column) -> Result<Vec<Option<f64>>> {
    let series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trades(rows: Vec<(&str, &str, Option<f64>, Option<f64>)>) -> TradePanel {
        let dt: Vec<&str> = rows.iter().map(|r| r.0).collect();
        let symbol: Vec<&str> = rows.iter().map(|r| r.1).collect();
        let close: Vec<Option<f64>> = rows.iter().map(|r| r.2).collect();
        let signal: Vec<Option<f64>> = rows.iter().map(|r| r.3).collect();
        TradePanel::new(
            df! {
                "dt" => dt,
                "symbol" => symbol,
                "close" => close,
                "signal" => signal,
            }
            .unwrap(),
        )
    }

    #[test]
    fn test_axes_sorted_and_deduplicated() {
        let panel = Panel::from_trades(&trades(vec![
            ("2024-01-03", "MSFT", Some(370.0), Some(0.5)),
            ("2024-01-02", "AAPL", Some(185.0), Some(0.4)),
            ("2024-01-02", "MSFT", Some(368.0), Some(0.6)),
            ("2024-01-03", "AAPL", Some(186.0), Some(0.5)),
        ]))
        .unwrap();

        assert_eq!(
            panel.dates(),
            &[
                Date::from_ymd_opt(2024, 1, 2).unwrap(),
                Date::from_ymd_opt(2024, 1, 3).unwrap()
            ]
        );
        assert_eq!(panel.symbols(), &["AAPL".to_string(), "MSFT".to_string()]);
        assert_eq!(panel.symbol_index("MSFT"), Some(1));
        assert_eq!(panel.prices()[[0, 0]], 185.0);
        assert_eq!(panel.prices()[[1, 1]], 370.0);
        assert_eq!(panel.signals()[[0, 1]], 0.6);
    }

    #[test]
    fn test_missing_column_rejected() {
        let df = df! {
            "dt" => &["2024-01-02"],
            "symbol" => &["AAPL"],
            "close" => &[185.0],
        }
        .unwrap();

        let err = Panel::from_trades(&TradePanel::new(df)).unwrap_err();
        assert!(matches!(err, NerjaError::MissingColumn(c) if c == "signal"));
    }

    #[test]
    fn test_empty_table_rejected() {
        let df = df! {
            "dt" => Vec::<&str>::new(),
            "symbol" => Vec::<&str>::new(),
            "close" => Vec::<f64>::new(),
            "signal" => Vec::<f64>::new(),
        }
        .unwrap();

        let err = Panel::from_trades(&TradePanel::new(df)).unwrap_err();
        assert!(matches!(err, NerjaError::MalformedInput(_)));
    }

    #[test]
    fn test_missing_cells() {
        // AAPL has no row at all on 01-03; MSFT has a null price and a
        // null signal on 01-02.
        let panel = Panel::from_trades(&trades(vec![
            ("2024-01-02", "AAPL", Some(185.0), Some(0.4)),
            ("2024-01-02", "MSFT", None, None),
            ("2024-01-03", "MSFT", Some(370.0), Some(0.6)),
        ]))
        .unwrap();

        assert!(panel.prices()[[1, 0]].is_nan());
        assert!(panel.prices()[[0, 1]].is_nan());
        assert_eq!(panel.signals()[[0, 1]], 0.0);
        assert_eq!(panel.signals()[[1, 0]], 0.0);
    }

    #[test]
    fn test_duplicate_pair_last_occurrence_wins() {
        let panel = Panel::from_trades(&trades(vec![
            ("2024-01-02", "AAPL", Some(185.0), Some(0.4)),
            ("2024-01-02", "AAPL", Some(190.0), Some(0.7)),
        ]))
        .unwrap();

        assert_eq!(panel.prices()[[0, 0]], 190.0);
        assert_eq!(panel.signals()[[0, 0]], 0.7);
    }

    #[test]
    fn test_integer_close_column_accepted() {
        let df = df! {
            "dt" => &["2024-01-02"],
            "symbol" => &["AAPL"],
            "close" => &[185i64],
            "signal" => &[1i64],
        }
        .unwrap();

        let panel = Panel::from_trades(&TradePanel::new(df)).unwrap();
        assert_eq!(panel.prices()[[0, 0]], 185.0);
        assert_eq!(panel.signals()[[0, 0]], 1.0);
    }
}
