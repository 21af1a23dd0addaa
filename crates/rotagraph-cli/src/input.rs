use std::fs;
use std::path::Path;

use rotagraph_core::{BarSeries, TradingDate};
use tracing::debug;

use crate::error::CliError;

/// Read a JSON array of bar series.
///
/// Bars are not validated here; the engine screens each series on its own so
/// a bad feed for one instrument does not fail the whole request.
pub fn load_series(path: &Path) -> Result<Vec<BarSeries>, CliError> {
    let raw = fs::read_to_string(path).map_err(|source| CliError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    let series: Vec<BarSeries> =
        serde_json::from_str(&raw).map_err(|source| CliError::InputFormat {
            path: path.to_path_buf(),
            source,
        })?;

    let invalid = series
        .iter()
        .filter(|entry| entry.validate().is_err())
        .count();

    debug!(
        path = %path.display(),
        series = series.len(),
        bars = series.iter().map(|entry| entry.bars.len()).sum::<usize>(),
        invalid,
        "loaded bar series"
    );
    Ok(series)
}

/// Latest bar date across all series, whatever order the bars are in.
pub fn latest_date(series: &[BarSeries]) -> Option<TradingDate> {
    series
        .iter()
        .flat_map(|entry| entry.bars.iter())
        .map(|bar| bar.date)
        .max()
}
