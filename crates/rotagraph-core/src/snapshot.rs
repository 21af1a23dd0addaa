//! Snapshot builder: daily classified RRG snapshots over a lookback horizon.
//!
//! Given RS-Ratio / RS-Momentum panels and the close prices they were derived
//! from, [`SnapshotBuilder::build`] selects the horizon of dates ending at the
//! (clamped) target date and emits one [`DailySnapshot`] per date. A snapshot
//! for date `d` reads nothing dated after `d`.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::panel::{OscillatorPanel, PricePanel};
use crate::quadrant::{classify, Quadrant};
use crate::rolling::checked_div;
use crate::{DailyBar, Instrument, RrgError, Symbol, TradingDate};

/// Observations back used for `weekly_change_pct`.
const WEEKLY_OBSERVATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotParams {
    /// Number of trailing defined dates to emit snapshots for.
    pub lookback_days: usize,
    /// Maximum number of points in each tail.
    pub tail_cap: usize,
}

impl Default for SnapshotParams {
    fn default() -> Self {
        Self {
            lookback_days: 60,
            tail_cap: 20,
        }
    }
}

impl SnapshotParams {
    pub const fn new(lookback_days: usize, tail_cap: usize) -> Self {
        Self {
            lookback_days,
            tail_cap,
        }
    }

    pub fn validate(&self) -> Result<(), RrgError> {
        if self.tail_cap == 0 {
            return Err(RrgError::invalid_parameter("tail_cap", "must be at least 1"));
        }
        Ok(())
    }
}

/// One (RS-Ratio, RS-Momentum) point of a tail; serialized as a 2-element
/// array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TailPoint(pub f64, pub f64);

impl TailPoint {
    pub const fn rs_ratio(self) -> f64 {
        self.0
    }

    pub const fn rs_momentum(self) -> f64 {
        self.1
    }
}

/// Per-instrument entry of a daily snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorRecord {
    pub name: String,
    pub ticker: Symbol,
    pub price: f64,
    pub change_pct: f64,
    pub rs_ratio: f64,
    pub rs_momentum: f64,
    pub quadrant: Quadrant,
    pub weekly_change_pct: f64,
    /// Oldest first, ending with the snapshot date's own point.
    pub tail: Vec<TailPoint>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuadrantCounts {
    pub leading: usize,
    pub improving: usize,
    pub lagging: usize,
    pub weakening: usize,
}

impl QuadrantCounts {
    pub fn get(&self, quadrant: Quadrant) -> usize {
        match quadrant {
            Quadrant::Leading => self.leading,
            Quadrant::Improving => self.improving,
            Quadrant::Lagging => self.lagging,
            Quadrant::Weakening => self.weakening,
            Quadrant::Undefined => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Instruments with both oscillators defined on this date, in request
    /// order.
    pub sectors: Vec<SectorRecord>,
    /// Horizon dates up to and including this snapshot's date.
    pub available_dates: Vec<TradingDate>,
}

impl DailySnapshot {
    pub fn sector(&self, ticker: &Symbol) -> Option<&SectorRecord> {
        self.sectors.iter().find(|sector| &sector.ticker == ticker)
    }

    pub fn quadrant_counts(&self) -> QuadrantCounts {
        let mut counts = QuadrantCounts::default();
        for sector in &self.sectors {
            match sector.quadrant {
                Quadrant::Leading => counts.leading += 1,
                Quadrant::Improving => counts.improving += 1,
                Quadrant::Lagging => counts.lagging += 1,
                Quadrant::Weakening => counts.weakening += 1,
                Quadrant::Undefined => {}
            }
        }
        counts
    }
}

/// Benchmark candle passed through for charting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkBar {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl From<&DailyBar> for BenchmarkBar {
    fn from(bar: &DailyBar) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
        }
    }
}

/// Output of one snapshot request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizonResult {
    /// Horizon dates in ascending order.
    pub date_range: Vec<TradingDate>,
    pub historical_data: BTreeMap<TradingDate, DailySnapshot>,
    /// Requested target date after clamping into the available range.
    pub target_date: TradingDate,
    /// Last date with any close price.
    pub latest_available_date: TradingDate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub benchmark_ohlc: Vec<BenchmarkBar>,
}

impl HorizonResult {
    pub fn snapshot(&self, date: TradingDate) -> Option<&DailySnapshot> {
        self.historical_data.get(&date)
    }

    /// Snapshots in horizon order.
    pub fn snapshots(&self) -> impl Iterator<Item = (TradingDate, &DailySnapshot)> + '_ {
        self.date_range
            .iter()
            .filter_map(|date| self.historical_data.get(date).map(|snapshot| (*date, snapshot)))
    }

    /// The snapshot on the last horizon date.
    pub fn latest(&self) -> Option<(TradingDate, &DailySnapshot)> {
        let date = *self.date_range.last()?;
        self.historical_data.get(&date).map(|snapshot| (date, snapshot))
    }

    /// Requested instruments that appear in no snapshot of the horizon.
    pub fn omitted_instruments(&self, requested: &[Symbol]) -> Vec<Symbol> {
        requested
            .iter()
            .filter(|symbol| {
                !self
                    .historical_data
                    .values()
                    .any(|snapshot| snapshot.sector(symbol).is_some())
            })
            .cloned()
            .collect()
    }
}

/// Builds [`HorizonResult`]s from transformer output.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder<'a> {
    rs_ratio: &'a OscillatorPanel,
    rs_momentum: &'a OscillatorPanel,
    close_prices: &'a PricePanel,
    names: HashMap<Symbol, String>,
}

impl<'a> SnapshotBuilder<'a> {
    pub fn new(
        rs_ratio: &'a OscillatorPanel,
        rs_momentum: &'a OscillatorPanel,
        close_prices: &'a PricePanel,
    ) -> Self {
        Self {
            rs_ratio,
            rs_momentum,
            close_prices,
            names: HashMap::new(),
        }
    }

    /// Display names for the records; instruments without one show their
    /// ticker.
    pub fn with_names<I>(mut self, instruments: I) -> Self
    where
        I: IntoIterator<Item = Instrument>,
    {
        self.names.extend(
            instruments
                .into_iter()
                .map(|instrument| (instrument.symbol, instrument.name)),
        );
        self
    }

    pub fn build(
        &self,
        target_date: TradingDate,
        params: &SnapshotParams,
    ) -> Result<HorizonResult, RrgError> {
        params.validate()?;
        self.check_alignment()?;

        let (Some(earliest), Some(latest)) = (
            self.close_prices.first_defined_date(),
            self.close_prices.last_defined_date(),
        ) else {
            return Err(RrgError::EmptyInput);
        };

        let clamped = target_date.clamp(earliest, latest);
        if clamped != target_date {
            warn!(
                requested = %target_date,
                clamped = %clamped,
                "target date outside available range, clamping"
            );
        }

        let dates = self.rs_ratio.dates();
        let defined_rows: Vec<usize> = (0..self.rs_ratio.rows())
            .filter(|row| dates[*row] <= clamped && self.row_is_defined(*row))
            .collect();
        if defined_rows.is_empty() {
            return Err(RrgError::NoRrgData {
                target_date: clamped,
            });
        }

        let horizon_start = defined_rows.len().saturating_sub(params.lookback_days);
        let horizon = &defined_rows[horizon_start..];
        let date_range: Vec<TradingDate> = horizon.iter().map(|row| dates[*row]).collect();

        let observations: Vec<Vec<(usize, f64)>> = self
            .rs_ratio
            .symbols()
            .iter()
            .map(|symbol| self.price_observations(symbol))
            .collect();

        let mut historical_data = BTreeMap::new();
        for (position, row) in horizon.iter().enumerate() {
            let sectors = (0..self.rs_ratio.symbols().len())
                .filter_map(|column| {
                    self.sector_record(column, *row, &horizon[..=position], params, &observations[column])
                })
                .collect();
            historical_data.insert(
                dates[*row],
                DailySnapshot {
                    sectors,
                    available_dates: date_range[..=position].to_vec(),
                },
            );
        }

        debug!(
            target_date = %clamped,
            latest_available_date = %latest,
            horizon = date_range.len(),
            instruments = self.rs_ratio.symbols().len(),
            "built snapshots"
        );

        Ok(HorizonResult {
            date_range,
            historical_data,
            target_date: clamped,
            latest_available_date: latest,
            benchmark_ohlc: Vec::new(),
        })
    }

    /// Ratio and momentum must be laid out identically, and their dates must
    /// be a prefix of the close-price dates.
    fn check_alignment(&self) -> Result<(), RrgError> {
        let ratio_dates = self.rs_ratio.dates();
        let aligned = self.rs_ratio.shares_index_with(self.rs_momentum)
            && self.rs_ratio.symbols() == self.rs_momentum.symbols()
            && self.close_prices.dates().starts_with(ratio_dates);
        if aligned {
            Ok(())
        } else {
            Err(RrgError::IndexMismatch)
        }
    }

    fn row_is_defined(&self, row: usize) -> bool {
        (0..self.rs_ratio.symbols().len()).any(|column| self.point(column, row).is_some())
    }

    fn point(&self, column: usize, row: usize) -> Option<TailPoint> {
        let ratio = self.rs_ratio.column_at(column)[row]?;
        let momentum = self.rs_momentum.column_at(column)[row]?;
        Some(TailPoint(ratio, momentum))
    }

    /// `(row, close)` of every defined close of `symbol`, in date order.
    fn price_observations(&self, symbol: &Symbol) -> Vec<(usize, f64)> {
        let Some(closes) = self.close_prices.column(symbol) else {
            debug!(instrument = %symbol, "no close prices for instrument");
            return Vec::new();
        };
        closes
            .iter()
            .enumerate()
            .filter_map(|(row, close)| close.map(|close| (row, close)))
            .collect()
    }

    fn sector_record(
        &self,
        column: usize,
        row: usize,
        horizon_so_far: &[usize],
        params: &SnapshotParams,
        observations: &[(usize, f64)],
    ) -> Option<SectorRecord> {
        let current = self.point(column, row)?;
        let ticker = self.rs_ratio.symbols()[column].clone();

        let tail_start = horizon_so_far.len().saturating_sub(params.tail_cap);
        let tail = horizon_so_far[tail_start..]
            .iter()
            .filter_map(|tail_row| self.point(column, *tail_row))
            .collect();

        let seen = observations.partition_point(|(observed, _)| *observed <= row);
        let closes = &observations[..seen];
        let price = closes.last().map_or(0.0, |(_, close)| *close);
        let change_pct = percent_change_back(closes, 1);
        let weekly_change_pct = percent_change_back(closes, WEEKLY_OBSERVATIONS);

        Some(SectorRecord {
            name: self
                .names
                .get(&ticker)
                .cloned()
                .unwrap_or_else(|| ticker.as_str().to_owned()),
            ticker,
            price,
            change_pct,
            rs_ratio: current.rs_ratio(),
            rs_momentum: current.rs_momentum(),
            quadrant: classify(Some(current.rs_ratio()), Some(current.rs_momentum())),
            weekly_change_pct,
            tail,
        })
    }
}

/// Build snapshots with ticker display names.
pub fn build_snapshots(
    rs_ratio: &OscillatorPanel,
    rs_momentum: &OscillatorPanel,
    close_prices: &PricePanel,
    target_date: TradingDate,
    params: &SnapshotParams,
) -> Result<HorizonResult, RrgError> {
    SnapshotBuilder::new(rs_ratio, rs_momentum, close_prices).build(target_date, params)
}

/// Percent change from the close `back` observations before the last one;
/// 0 when there is not enough history.
fn percent_change_back(closes: &[(usize, f64)], back: usize) -> f64 {
    let Some(last) = closes.len().checked_sub(1) else {
        return 0.0;
    };
    let Some(previous) = last.checked_sub(back) else {
        return 0.0;
    };
    checked_div(closes[last].1, closes[previous].1)
        .map_or(0.0, |ratio| (ratio - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Panel;

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("symbol")
    }

    fn dates(count: usize) -> Vec<TradingDate> {
        let mut current = TradingDate::parse("2025-03-03").expect("date");
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            out.push(current);
            current = current.next_weekday().expect("in range");
        }
        out
    }

    fn panel(dates: &[TradingDate], columns: Vec<(&str, Vec<Option<f64>>)>) -> Panel {
        Panel::from_columns(
            dates.to_vec(),
            columns
                .into_iter()
                .map(|(name, values)| (symbol(name), values))
                .collect(),
        )
        .expect("panel")
    }

    #[test]
    fn percent_change_needs_enough_observations() {
        let closes = [(0, 100.0), (1, 110.0)];
        assert!((percent_change_back(&closes, 1) - 10.0).abs() < 1e-9);
        assert_eq!(percent_change_back(&closes, 5), 0.0);
        assert_eq!(percent_change_back(&[], 1), 0.0);
    }

    #[test]
    fn tail_skips_undefined_points_and_respects_cap() {
        let days = dates(4);
        let ratio = panel(&days, vec![("A", vec![Some(101.0), None, Some(103.0), Some(104.0)])]);
        let momentum = panel(&days, vec![("A", vec![Some(99.0), Some(98.0), Some(97.0), Some(96.0)])]);
        let prices = panel(&days, vec![("A", vec![Some(10.0); 4])]);

        let result = build_snapshots(
            &ratio,
            &momentum,
            &prices,
            days[3],
            &SnapshotParams::new(10, 3),
        )
        .expect("snapshots");

        // row 1 has no ratio for the only instrument, so it is not a horizon date
        assert_eq!(result.date_range, vec![days[0], days[2], days[3]]);
        let (_, last) = result.latest().expect("latest");
        let record = last.sector(&symbol("A")).expect("present");
        assert_eq!(
            record.tail,
            vec![
                TailPoint(101.0, 99.0),
                TailPoint(103.0, 97.0),
                TailPoint(104.0, 96.0)
            ]
        );
        assert_eq!(record.quadrant, Quadrant::Weakening);
    }

    #[test]
    fn rejects_misaligned_panels() {
        let days = dates(3);
        let ratio = panel(&days, vec![("A", vec![Some(100.0); 3])]);
        let momentum = panel(&days[..2], vec![("A", vec![Some(100.0); 2])]);
        let prices = panel(&days, vec![("A", vec![Some(10.0); 3])]);

        let err = build_snapshots(&ratio, &momentum, &prices, days[2], &SnapshotParams::default())
            .expect_err("must fail");
        assert!(matches!(err, RrgError::IndexMismatch));
    }

    #[test]
    fn rejects_zero_tail_cap() {
        let days = dates(1);
        let ratio = panel(&days, vec![("A", vec![Some(100.0)])]);
        let prices = panel(&days, vec![("A", vec![Some(10.0)])]);
        let err = build_snapshots(&ratio, &ratio, &prices, days[0], &SnapshotParams::new(5, 0))
            .expect_err("must fail");
        assert!(matches!(err, RrgError::InvalidParameter { name: "tail_cap", .. }));
    }

    #[test]
    fn names_come_from_instruments() {
        let days = dates(1);
        let ratio = panel(&days, vec![("1631.T", vec![Some(100.0)])]);
        let prices = panel(&days, vec![("1631.T", vec![Some(10.0)])]);
        let result = SnapshotBuilder::new(&ratio, &ratio, &prices)
            .with_names([Instrument::new(symbol("1631.T"), "Banks")])
            .build(days[0], &SnapshotParams::default())
            .expect("snapshots");

        let (_, snapshot) = result.latest().expect("latest");
        assert_eq!(snapshot.sectors[0].name, "Banks");
        assert_eq!(snapshot.quadrant_counts().get(Quadrant::Leading), 1);
    }
}
