//! # Domain Models
//!
//! Canonical domain types consumed by the rotation engine.
//!
//! ## Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated instrument identifier |
//! | [`TradingDate`] | ISO calendar date of a trading session |
//! | [`DailyBar`] | Daily OHLCV bar |
//! | [`BarSeries`] | Ordered daily bars for one symbol |
//! | [`Instrument`] | Symbol plus display name |
//! | [`Universe`] | Benchmarks and sector proxies |
//!
//! ## Validation
//!
//! All domain types enforce invariants at construction time:
//!
//! ```rust
//! use rotagraph_core::{DailyBar, TradingDate, ValidationError};
//!
//! let date = TradingDate::parse("2025-08-29").unwrap();
//! let bar = DailyBar::new(date, 100.0, 105.0, 95.0, 102.0, Some(1000));
//! assert!(bar.is_ok());
//!
//! let invalid = DailyBar::new(date, 100.0, 95.0, 105.0, 102.0, Some(1000));
//! assert!(matches!(invalid, Err(ValidationError::InvalidBarRange)));
//! ```

mod bar;
mod instrument;
mod symbol;
mod trading_date;

pub(crate) use bar::validate_price;
pub use bar::{BarSeries, DailyBar};
pub use instrument::{Instrument, Universe};
pub use symbol::Symbol;
pub use trading_date::TradingDate;
