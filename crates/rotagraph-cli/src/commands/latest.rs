use rotagraph_core::{HorizonResult, QuadrantCounts, SectorRecord, TradingDate};
use serde::Serialize;

use crate::cli::ComputeArgs;
use crate::error::CliError;

use super::compute::evaluate;
use super::CommandResult;

/// Single-date view: the last snapshot of the horizon.
#[derive(Debug, Serialize)]
struct LatestView {
    date: Option<TradingDate>,
    target_date: TradingDate,
    latest_available_date: TradingDate,
    quadrant_counts: QuadrantCounts,
    sectors: Vec<SectorRecord>,
}

impl LatestView {
    fn from_result(result: &HorizonResult) -> Self {
        let (date, quadrant_counts, sectors) = match result.latest() {
            Some((date, snapshot)) => (
                Some(date),
                snapshot.quadrant_counts(),
                snapshot.sectors.clone(),
            ),
            None => (None, QuadrantCounts::default(), Vec::new()),
        };

        Self {
            date,
            target_date: result.target_date,
            latest_available_date: result.latest_available_date,
            quadrant_counts,
            sectors,
        }
    }
}

pub fn run(args: &ComputeArgs) -> Result<CommandResult, CliError> {
    let computation = evaluate(args)?;

    match &computation.outcome {
        Ok(result) => {
            let mut warnings = computation.warnings(result);
            if result.date_range.is_empty() {
                warnings.push(String::from("lookback is 0; no snapshot to show"));
            }
            let data = serde_json::to_value(LatestView::from_result(result))?;
            Ok(CommandResult::ok(data)
                .with_warnings(warnings)
                .with_latency(computation.latency_ms))
        }
        Err(error) => Ok(CommandResult::failed(error).with_latency(computation.latency_ms)),
    }
}

#[cfg(test)]
mod tests {
    use super::super::compute::tests::{args, market_file};
    use super::*;

    #[test]
    fn shows_the_last_snapshot_with_counts() {
        let file = market_file();

        let result = run(&args(file.path().to_path_buf())).expect("latest");

        assert!(result.errors.is_empty());
        assert_eq!(result.data["date"], "2025-06-20");
        assert_eq!(result.data["quadrant_counts"]["leading"], 1);
        assert_eq!(result.data["quadrant_counts"]["lagging"], 1);
        let sectors = result.data["sectors"].as_array().expect("sectors");
        assert_eq!(sectors[0]["quadrant"], "Leading");
        assert_eq!(sectors[1]["name"], "Real Estate");
    }

    #[test]
    fn empty_horizon_is_a_warning() {
        let file = market_file();
        let mut args = args(file.path().to_path_buf());
        args.tuning.lookback = Some(0);

        let result = run(&args).expect("latest");

        assert!(result.data["date"].is_null());
        assert_eq!(result.warnings.len(), 1);
    }
}
