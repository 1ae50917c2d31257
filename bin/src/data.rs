//! Data loading utilities for the Nerja CLI.

use std::fs::File;
use std::path::Path;

use nerja_traits::{NerjaError, TradePanel};
use polars::prelude::*;

/// Load a long-format trade table from a columnar file.
///
/// The format is inferred from the file extension: `.parquet` or `.csv`.
/// CSV dates are parsed during the scan, so a plain `YYYY-MM-DD` column
/// works either way.
pub(crate) fn load_trades(path: &Path) -> Result<TradePanel, NerjaError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();

    let df = match extension.as_str() {
        "parquet" => {
            let file = File::open(path).map_err(|e| {
                NerjaError::MalformedInput(format!("cannot open {}: {}", path.display(), e))
            })?;
            ParquetReader::new(file).finish()?
        }
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .with_try_parse_dates(true)
            .finish()?
            .collect()?,
        other => {
            return Err(NerjaError::MalformedInput(format!(
                "unsupported input format '{other}', expected parquet or csv"
            )));
        }
    };

    Ok(TradePanel::new(df))
}

/// Write a DataFrame as a parquet file.
pub(crate) fn write_parquet(df: &mut DataFrame, path: &Path) -> Result<(), NerjaError> {
    let file = File::create(path).map_err(|e| {
        NerjaError::MalformedInput(format!("cannot create {}: {}", path.display(), e))
    })?;
    ParquetWriter::new(file).finish(df)?;
    Ok(())
}
