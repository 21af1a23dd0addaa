//! Series transformer: close prices → relative strength → RS-Ratio and
//! RS-Momentum oscillators.
//!
//! For instrument `i` against benchmark `b` on date `d`:
//!
//! ```text
//! rs[i,d]          = close[i,d] / close[b,d]
//! rs_ratio[i,d]    = 100 + (rs[i,d] / sma(rs[i], ratio_window)[d] - 1) * 100
//! pct[i,d]         = rs[i,d] / rs[i,d-momentum_change_period] - 1
//! rs_momentum[i,d] = 100 + sma(pct[i], momentum_smoothing_window)[d] * 100
//! ```
//!
//! Windows are trailing only, so a value at `d` never depends on data after
//! `d`. Every moving average needs a full window of consecutive defined
//! inputs; anything short of that leaves the output cell undefined.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::panel::{OscillatorPanel, PricePanel, RatioPanel};
use crate::rolling::{checked_div, finite, RollingMean};
use crate::{Panel, RrgError, Symbol};

/// Value both oscillators are centred on.
pub const PIVOT: f64 = 100.0;

/// Rolling-window lengths, in trading-day observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    pub ratio_window: usize,
    pub momentum_change_period: usize,
    pub momentum_smoothing_window: usize,
}

impl Default for WindowParams {
    fn default() -> Self {
        WindowPreset::ShortTerm.params()
    }
}

impl WindowParams {
    pub const fn new(
        ratio_window: usize,
        momentum_change_period: usize,
        momentum_smoothing_window: usize,
    ) -> Self {
        Self {
            ratio_window,
            momentum_change_period,
            momentum_smoothing_window,
        }
    }

    pub fn validate(&self) -> Result<(), RrgError> {
        let checks = [
            ("ratio_window", self.ratio_window),
            ("momentum_change_period", self.momentum_change_period),
            ("momentum_smoothing_window", self.momentum_smoothing_window),
        ];
        for (name, value) in checks {
            if value == 0 {
                return Err(RrgError::invalid_parameter(name, "must be at least 1"));
            }
        }
        Ok(())
    }

    /// Leading observations of a continuous series with no RS-Ratio.
    pub const fn ratio_warmup(&self) -> usize {
        self.ratio_window.saturating_sub(1)
    }

    /// Leading observations of a continuous series with no RS-Momentum.
    pub const fn momentum_warmup(&self) -> usize {
        (self.momentum_change_period + self.momentum_smoothing_window).saturating_sub(1)
    }
}

/// Named window configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowPreset {
    /// 60 / 5 / 10: daily short-term rotation.
    ShortTerm,
    /// 52 / 4 / 13: the classic weekly-style parameterisation.
    Classic,
}

impl WindowPreset {
    pub const ALL: [Self; 2] = [Self::ShortTerm, Self::Classic];

    pub const fn params(self) -> WindowParams {
        match self {
            Self::ShortTerm => WindowParams::new(60, 5, 10),
            Self::Classic => WindowParams::new(52, 4, 13),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShortTerm => "short-term",
            Self::Classic => "classic",
        }
    }
}

impl Display for WindowPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WindowPreset {
    type Err = RrgError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "short-term" | "short_term" | "short" => Ok(Self::ShortTerm),
            "classic" => Ok(Self::Classic),
            other => Err(RrgError::invalid_parameter(
                "preset",
                format!("unknown preset '{other}', expected short-term or classic"),
            )),
        }
    }
}

/// Derived panels of one transform call. All three share the input's date
/// index (truncated after the last date with any price) and list
/// instruments in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct RrgPanels {
    pub relative_strength: RatioPanel,
    pub rs_ratio: OscillatorPanel,
    pub rs_momentum: OscillatorPanel,
}

/// Turn a close-price panel into relative-strength, RS-Ratio and RS-Momentum
/// panels for `instruments` measured against `benchmark`.
///
/// Instruments absent from the panel produce all-undefined columns.
pub fn transform(
    close_prices: &PricePanel,
    benchmark: &Symbol,
    instruments: &[Symbol],
    params: &WindowParams,
) -> Result<RrgPanels, RrgError> {
    params.validate()?;
    validate_instruments(benchmark, instruments)?;

    let benchmark_column =
        close_prices
            .column(benchmark)
            .ok_or_else(|| RrgError::MissingBenchmark {
                benchmark: benchmark.to_string(),
            })?;

    let Some(last_date) = close_prices.last_defined_date() else {
        return Err(RrgError::EmptyInput);
    };

    if benchmark_column.iter().all(Option::is_none) {
        return Err(RrgError::EmptyBenchmarkSeries {
            benchmark: benchmark.to_string(),
        });
    }

    let rows = close_prices.rows_through(last_date);
    let dates = close_prices.dates()[..rows].to_vec();
    let benchmark_column = &benchmark_column[..rows];

    let mut rs_columns = Vec::with_capacity(instruments.len());
    let mut ratio_columns = Vec::with_capacity(instruments.len());
    let mut momentum_columns = Vec::with_capacity(instruments.len());

    for instrument in instruments {
        let rs = match close_prices.column(instrument) {
            Some(closes) => relative_strength(&closes[..rows], benchmark_column),
            None => {
                debug!(instrument = %instrument, "instrument has no price column");
                vec![None; rows]
            }
        };
        ratio_columns.push(rs_ratio(&rs, params.ratio_window));
        momentum_columns.push(rs_momentum(
            &rs,
            params.momentum_change_period,
            params.momentum_smoothing_window,
        ));
        rs_columns.push(rs);
    }

    let defined = |columns: &[Vec<Option<f64>>]| {
        columns
            .iter()
            .flatten()
            .filter(|value| value.is_some())
            .count()
    };
    let ratio_defined = defined(&ratio_columns);
    let momentum_defined = defined(&momentum_columns);

    debug!(
        benchmark = %benchmark,
        instruments = instruments.len(),
        rows,
        ratio_defined,
        momentum_defined,
        "transformed close prices"
    );

    if ratio_defined == 0 || momentum_defined == 0 {
        return Err(RrgError::EmptyResult);
    }

    Ok(RrgPanels {
        relative_strength: Panel::derived(dates.clone(), instruments.to_vec(), rs_columns),
        rs_ratio: Panel::derived(dates.clone(), instruments.to_vec(), ratio_columns),
        rs_momentum: Panel::derived(dates, instruments.to_vec(), momentum_columns),
    })
}

fn validate_instruments(benchmark: &Symbol, instruments: &[Symbol]) -> Result<(), RrgError> {
    let mut seen = HashSet::with_capacity(instruments.len());
    for instrument in instruments {
        if instrument == benchmark {
            return Err(RrgError::invalid_parameter(
                "instruments",
                format!("benchmark '{benchmark}' cannot also be an instrument"),
            ));
        }
        if !seen.insert(instrument) {
            return Err(RrgError::invalid_parameter(
                "instruments",
                format!("'{instrument}' is listed more than once"),
            ));
        }
    }
    Ok(())
}

fn relative_strength(closes: &[Option<f64>], benchmark: &[Option<f64>]) -> Vec<Option<f64>> {
    closes
        .iter()
        .zip(benchmark)
        .map(|(close, bench)| match (close, bench) {
            (Some(close), Some(bench)) => checked_div(*close, *bench),
            _ => None,
        })
        .collect()
}

fn rs_ratio(rs: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut mean = RollingMean::new(window);
    rs.iter()
        .map(|value| {
            let average = mean.push(*value)?;
            let normalized = checked_div((*value)?, average)?;
            finite(PIVOT + (normalized - 1.0) * 100.0)
        })
        .collect()
}

fn rs_momentum(rs: &[Option<f64>], change_period: usize, window: usize) -> Vec<Option<f64>> {
    let mut mean = RollingMean::new(window);
    (0..rs.len())
        .map(|row| {
            let change = row
                .checked_sub(change_period)
                .and_then(|previous| match (rs[row], rs[previous]) {
                    (Some(current), Some(previous)) => checked_div(current, previous),
                    _ => None,
                })
                .map(|ratio| ratio - 1.0);
            let average = mean.push(change)?;
            finite(PIVOT + average * 100.0)
        })
        .collect()
}
