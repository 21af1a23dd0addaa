use std::time::Instant;

use rotagraph_core::{
    BarSeries, EngineConfig, HorizonResult, Instrument, RrgEngine, RrgError, RrgRequest,
    SnapshotParams, Symbol, TradingDate, Universe, WindowParams, WindowPreset,
};
use time::OffsetDateTime;
use tracing::info;

use crate::cli::{ComputeArgs, TuningArgs};
use crate::error::CliError;
use crate::input;

use super::CommandResult;

/// A finished engine call: the request that was sent and what came back.
pub struct Computation {
    pub request: RrgRequest,
    pub outcome: Result<HorizonResult, RrgError>,
    pub latency_ms: u64,
}

impl Computation {
    /// Clamping and omitted instruments, phrased for envelope warnings.
    pub fn warnings(&self, result: &HorizonResult) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Ok(requested) = self.request.parse_target_date() {
            if requested != result.target_date {
                warnings.push(format!(
                    "target date {requested} is outside the available data; clamped to {}",
                    result.target_date
                ));
            }
        }

        let omitted = result.omitted_instruments(&self.request.symbols());
        if !omitted.is_empty() {
            let tickers = omitted
                .iter()
                .map(Symbol::as_str)
                .collect::<Vec<_>>()
                .join(",");
            warnings.push(format!("no RRG data for instruments: {tickers}"));
        }

        warnings
    }
}

pub fn run(args: &ComputeArgs) -> Result<CommandResult, CliError> {
    let computation = evaluate(args)?;

    match &computation.outcome {
        Ok(result) => {
            let data = serde_json::to_value(result)?;
            Ok(CommandResult::ok(data)
                .with_warnings(computation.warnings(result))
                .with_latency(computation.latency_ms))
        }
        Err(error) => Ok(CommandResult::failed(error).with_latency(computation.latency_ms)),
    }
}

/// Load the input file, assemble the request and run the engine.
///
/// Input and argument problems are CLI errors; engine failures are returned
/// in `outcome` so they can be reported inside the envelope.
pub fn evaluate(args: &ComputeArgs) -> Result<Computation, CliError> {
    let series = input::load_series(&args.input)?;
    let universe = Universe::topix17()?;
    let benchmark = Symbol::parse(&args.benchmark)?;

    let instruments = if args.instruments.is_empty() {
        default_instruments(&series, &benchmark, &universe)
    } else {
        args.instruments
            .iter()
            .map(|raw| {
                let symbol = Symbol::parse(raw)?;
                let name = universe.display_name(&symbol);
                Ok(Instrument::new(symbol, name))
            })
            .collect::<Result<Vec<_>, CliError>>()?
    };

    let target_date = args.date.clone().unwrap_or_else(|| {
        input::latest_date(&series)
            .unwrap_or_else(|| TradingDate::from_date(OffsetDateTime::now_utc().date()))
            .to_string()
    });

    let request = RrgRequest::new(benchmark, instruments, target_date);
    let config = engine_config(&args.tuning);

    let started = Instant::now();
    let outcome = RrgEngine::new(config).and_then(|engine| engine.compute(&request, &series));
    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    info!(
        benchmark = %request.benchmark,
        instruments = request.instruments.len(),
        target_date = %request.target_date,
        ok = outcome.is_ok(),
        latency_ms,
        "rotation graph request finished"
    );

    Ok(Computation {
        request,
        outcome,
        latency_ms,
    })
}

/// Every input series except the benchmark, in file order.
fn default_instruments(
    series: &[BarSeries],
    benchmark: &Symbol,
    universe: &Universe,
) -> Vec<Instrument> {
    let mut instruments: Vec<Instrument> = Vec::new();
    for entry in series {
        let duplicate = instruments
            .iter()
            .any(|instrument| instrument.symbol == entry.symbol);
        if &entry.symbol != benchmark && !duplicate {
            instruments.push(Instrument::new(
                entry.symbol.clone(),
                universe.display_name(&entry.symbol),
            ));
        }
    }
    instruments
}

/// Environment settings with command-line overrides applied on top.
fn engine_config(tuning: &TuningArgs) -> EngineConfig {
    engine_config_from(EngineConfig::from_env(), tuning)
}

/// A preset replaces the base windows; individual flags win over both.
fn engine_config_from(base: EngineConfig, tuning: &TuningArgs) -> EngineConfig {
    let windows = tuning
        .preset
        .map(|preset| WindowPreset::from(preset).params())
        .unwrap_or(base.windows);

    EngineConfig::new(
        WindowParams::new(
            tuning.ratio_window.unwrap_or(windows.ratio_window),
            tuning
                .momentum_period
                .unwrap_or(windows.momentum_change_period),
            tuning
                .momentum_window
                .unwrap_or(windows.momentum_smoothing_window),
        ),
        SnapshotParams::new(
            tuning.lookback.unwrap_or(base.snapshot.lookback_days),
            tuning.tail.unwrap_or(base.snapshot.tail_cap),
        ),
    )
}
