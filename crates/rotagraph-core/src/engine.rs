//! Request-level facade over the transformer and the snapshot builder.
//!
//! # Example
//!
//! ```rust,ignore
//! use rotagraph_core::{EngineConfig, Instrument, RrgEngine, RrgRequest, Symbol};
//!
//! let engine = RrgEngine::new(EngineConfig::default())?;
//! let request = RrgRequest::new(
//!     Symbol::parse("1306.T")?,
//!     vec![Instrument::parse("1631.T", "Banks")?],
//!     "2025-08-29",
//! );
//! let result = engine.compute(&request, &bar_series)?;
//! println!("{} snapshots up to {}", result.date_range.len(), result.target_date);
//! ```

use tracing::debug;

use crate::snapshot::{BenchmarkBar, HorizonResult, SnapshotBuilder};
use crate::transform::transform;
use crate::{
    BarSeries, EngineConfig, Instrument, PricePanel, RrgError, Symbol, TradingDate,
};

/// One RRG computation: benchmark, instruments in display order, and the
/// point-in-time target date as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct RrgRequest {
    pub benchmark: Symbol,
    pub instruments: Vec<Instrument>,
    pub target_date: String,
}

impl RrgRequest {
    pub fn new(
        benchmark: Symbol,
        instruments: Vec<Instrument>,
        target_date: impl Into<String>,
    ) -> Self {
        Self {
            benchmark,
            instruments,
            target_date: target_date.into(),
        }
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.instruments
            .iter()
            .map(|instrument| instrument.symbol.clone())
            .collect()
    }

    pub fn parse_target_date(&self) -> Result<TradingDate, RrgError> {
        TradingDate::parse(&self.target_date).map_err(|_| RrgError::InvalidDate {
            value: self.target_date.clone(),
        })
    }
}

/// Stateless engine; every call recomputes from its inputs, so one engine
/// can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct RrgEngine {
    config: EngineConfig,
}

impl RrgEngine {
    pub fn new(config: EngineConfig) -> Result<Self, RrgError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute snapshots from raw bar series and attach the benchmark's
    /// candles up to the clamped target date.
    ///
    /// Bad bars are screened per series: see [`PricePanel::from_bar_series`].
    /// Benchmark candles that fail OHLC validation are left out of
    /// `benchmark_ohlc`.
    pub fn compute(
        &self,
        request: &RrgRequest,
        series: &[BarSeries],
    ) -> Result<HorizonResult, RrgError> {
        let target_date = request.parse_target_date()?;
        let close_prices = PricePanel::from_bar_series(series)?;
        let mut result = self.compute_at(request, &close_prices, target_date)?;

        if let Some(benchmark) = series
            .iter()
            .find(|entry| entry.symbol == request.benchmark)
        {
            result.benchmark_ohlc = benchmark
                .bars
                .iter()
                .filter(|bar| bar.date <= result.target_date && bar.validate().is_ok())
                .map(BenchmarkBar::from)
                .collect();
        }

        Ok(result)
    }

    /// Compute snapshots from an already aligned close-price panel.
    pub fn compute_panel(
        &self,
        request: &RrgRequest,
        close_prices: &PricePanel,
    ) -> Result<HorizonResult, RrgError> {
        let target_date = request.parse_target_date()?;
        self.compute_at(request, close_prices, target_date)
    }

    fn compute_at(
        &self,
        request: &RrgRequest,
        close_prices: &PricePanel,
        target_date: TradingDate,
    ) -> Result<HorizonResult, RrgError> {
        debug!(
            benchmark = %request.benchmark,
            instruments = request.instruments.len(),
            target_date = %target_date,
            "computing rotation graph"
        );

        let panels = transform(
            close_prices,
            &request.benchmark,
            &request.symbols(),
            &self.config.windows,
        )?;

        SnapshotBuilder::new(&panels.rs_ratio, &panels.rs_momentum, close_prices)
            .with_names(request.instruments.iter().cloned())
            .build(target_date, &self.config.snapshot)
    }
}
