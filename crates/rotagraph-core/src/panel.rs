//! Date × instrument matrices.
//!
//! A [`Panel`] stores one `Option<f64>` per (trading date, instrument) cell in
//! a flat column-major buffer. Columns are addressed by a stable integer
//! position, with a `Symbol → position` map for lookups by identifier. `None`
//! marks an absent observation (listing gap, provider gap, or a derived value
//! that is undefined); panels never forward-fill.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::domain::validate_price;
use crate::{BarSeries, Symbol, TradingDate, ValidationError};

/// Adjusted close prices, strictly positive where present.
pub type PricePanel = Panel;
/// Instrument close divided by benchmark close.
pub type RatioPanel = Panel;
/// RS-Ratio or RS-Momentum values oscillating around 100.
pub type OscillatorPanel = Panel;

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<TradingDate>,
    symbols: Vec<Symbol>,
    index: HashMap<Symbol, usize>,
    values: Vec<Option<f64>>,
}

impl Panel {
    /// Build a price panel; every present value must be finite and > 0.
    pub fn prices(
        dates: Vec<TradingDate>,
        columns: Vec<(Symbol, Vec<Option<f64>>)>,
    ) -> Result<Self, ValidationError> {
        for (_, column) in &columns {
            for value in column.iter().flatten() {
                validate_price("close", *value)?;
            }
        }
        Self::from_columns(dates, columns)
    }

    /// Build a panel whose present values only need to be finite.
    pub fn from_columns(
        dates: Vec<TradingDate>,
        columns: Vec<(Symbol, Vec<Option<f64>>)>,
    ) -> Result<Self, ValidationError> {
        validate_dates(&dates)?;

        let rows = dates.len();
        let mut symbols = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(rows * columns.len());
        for (symbol, column) in columns {
            if column.len() != rows {
                return Err(ValidationError::ColumnLengthMismatch {
                    symbol: symbol.to_string(),
                    expected: rows,
                    actual: column.len(),
                });
            }
            if column.iter().flatten().any(|value| !value.is_finite()) {
                return Err(ValidationError::NonFiniteValue { field: "panel" });
            }
            symbols.push(symbol);
            values.extend(column);
        }

        let index = build_index(&symbols)?;
        Ok(Self {
            dates,
            symbols,
            index,
            values,
        })
    }

    /// Align close prices of several bar series onto the union of their dates.
    ///
    /// Only closes are read. A close that is not a positive finite number
    /// leaves its cell undefined, and a series whose dates are not strictly
    /// increasing is left out, so one bad feed never sinks the others.
    pub fn from_bar_series(series: &[BarSeries]) -> Result<Self, ValidationError> {
        let usable: Vec<&BarSeries> = series
            .iter()
            .filter(|entry| match entry.check_order() {
                Ok(()) => true,
                Err(error) => {
                    debug!(symbol = %entry.symbol, %error, "dropping unordered bar series");
                    false
                }
            })
            .collect();

        let dates: Vec<TradingDate> = usable
            .iter()
            .flat_map(|entry| entry.bars.iter())
            .filter(|bar| bar.usable_close().is_some())
            .map(|bar| bar.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = usable
            .iter()
            .map(|entry| {
                let mut column = vec![None; dates.len()];
                let mut skipped = 0_usize;
                for bar in &entry.bars {
                    match (bar.usable_close(), dates.binary_search(&bar.date)) {
                        (Some(close), Ok(row)) => column[row] = Some(close),
                        _ => skipped += 1,
                    }
                }
                if skipped > 0 {
                    debug!(symbol = %entry.symbol, skipped, "left unusable closes undefined");
                }
                (entry.symbol.clone(), column)
            })
            .collect();

        Self::prices(dates, columns)
    }

    /// Panel assembled by the crate itself from already-validated parts.
    pub(crate) fn derived(
        dates: Vec<TradingDate>,
        symbols: Vec<Symbol>,
        columns: Vec<Vec<Option<f64>>>,
    ) -> Self {
        let index = symbols
            .iter()
            .enumerate()
            .map(|(position, symbol)| (symbol.clone(), position))
            .collect();
        Self {
            dates,
            symbols,
            index,
            values: columns.into_iter().flatten().collect(),
        }
    }

    pub fn dates(&self) -> &[TradingDate] {
        &self.dates
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn rows(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.symbols.is_empty()
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.index.contains_key(symbol)
    }

    pub fn position(&self, symbol: &Symbol) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    pub fn column(&self, symbol: &Symbol) -> Option<&[Option<f64>]> {
        self.position(symbol).map(|position| self.column_at(position))
    }

    /// Column by position; callers pass positions taken from `symbols()`.
    pub(crate) fn column_at(&self, position: usize) -> &[Option<f64>] {
        let rows = self.rows();
        &self.values[position * rows..(position + 1) * rows]
    }

    pub fn value(&self, row: usize, symbol: &Symbol) -> Option<f64> {
        self.column(symbol)
            .and_then(|column| column.get(row).copied().flatten())
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_some()).count()
    }

    pub fn row_has_defined(&self, row: usize) -> bool {
        (0..self.symbols.len()).any(|position| self.column_at(position)[row].is_some())
    }

    pub fn first_defined_date(&self) -> Option<TradingDate> {
        (0..self.rows())
            .find(|row| self.row_has_defined(*row))
            .map(|row| self.dates[row])
    }

    pub fn last_defined_date(&self) -> Option<TradingDate> {
        (0..self.rows())
            .rev()
            .find(|row| self.row_has_defined(*row))
            .map(|row| self.dates[row])
    }

    /// Number of leading rows dated on or before `date`.
    pub fn rows_through(&self, date: TradingDate) -> usize {
        self.dates.partition_point(|candidate| *candidate <= date)
    }

    pub fn row_of(&self, date: TradingDate) -> Option<usize> {
        self.dates.binary_search(&date).ok()
    }

    pub fn shares_index_with(&self, other: &Panel) -> bool {
        self.dates == other.dates
    }
}

fn validate_dates(dates: &[TradingDate]) -> Result<(), ValidationError> {
    for pair in dates.windows(2) {
        if pair[0] >= pair[1] {
            return Err(ValidationError::UnorderedDates {
                previous: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(())
}

fn build_index(symbols: &[Symbol]) -> Result<HashMap<Symbol, usize>, ValidationError> {
    let mut index = HashMap::with_capacity(symbols.len());
    for (position, symbol) in symbols.iter().enumerate() {
        if index.insert(symbol.clone(), position).is_some() {
            return Err(ValidationError::DuplicateSymbol {
                symbol: symbol.to_string(),
            });
        }
    }
    Ok(index)
}
