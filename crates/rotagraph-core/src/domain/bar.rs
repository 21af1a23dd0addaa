use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// Daily OHLCV bar as delivered by the market-data collaborator. Prices are
/// expected to be already adjusted for corporate actions upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl DailyBar {
    pub fn new(
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Re-check invariants, e.g. after deserializing untrusted input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_price("open", self.open)?;
        validate_price("high", self.high)?;
        validate_price("low", self.low)?;
        validate_price("close", self.close)?;

        if self.high < self.low {
            return Err(ValidationError::InvalidBarRange);
        }

        if self.open < self.low
            || self.open > self.high
            || self.close < self.low
            || self.close > self.high
        {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(())
    }

    /// The close, if it can enter a price panel; the other fields are not
    /// looked at.
    pub fn usable_close(&self) -> Option<f64> {
        validate_price("close", self.close).ok().map(|()| self.close)
    }
}

/// Daily bars for one symbol, in ascending date order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: Symbol,
    #[serde(default)]
    pub bars: Vec<DailyBar>,
}

impl BarSeries {
    pub fn new(symbol: Symbol, bars: Vec<DailyBar>) -> Self {
        Self { symbol, bars }
    }

    /// Validate every bar and the strictly increasing date order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for bar in &self.bars {
            bar.validate()?;
        }
        self.check_order()
    }

    /// Dates must be strictly increasing.
    pub fn check_order(&self) -> Result<(), ValidationError> {
        for pair in self.bars.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(ValidationError::UnorderedDates {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }

        Ok(())
    }
}

/// A close price must be finite and strictly positive to enter a panel.
pub(crate) fn validate_price(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}
