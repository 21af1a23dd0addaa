//! # Rotagraph Core
//!
//! Analytics engine for Relative Rotation Graphs (RRG).
//!
//! ## Overview
//!
//! For a basket of instruments measured against a benchmark, the engine
//! derives two smoothed series per instrument, RS-Ratio and RS-Momentum,
//! and classifies each instrument on each trading day into one of four
//! rotation quadrants.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`domain`] | Symbols, trading dates, daily bars, instruments and universe |
//! | [`panel`] | Date × instrument matrices with id → column lookup |
//! | [`rolling`] | Running-sum moving average |
//! | [`transform`] | Close prices → relative strength → RS-Ratio / RS-Momentum |
//! | [`quadrant`] | Quadrant classification |
//! | [`snapshot`] | Per-date snapshots with bounded tails |
//! | [`engine`] | Request facade tying the pieces together |
//! | [`config`] | Tunables, presets and environment overrides |
//! | [`envelope`] | Machine-readable response wrapper |
//! | [`error`] | Validation errors and the request error taxonomy |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  BarSeries[]    │  (from the market-data collaborator)
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐
//! │  PricePanel     │
//! └────────┬────────┘
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  transform      │────▶│ RS-Ratio /       │
//! │                 │     │ RS-Momentum      │
//! └─────────────────┘     └────────┬─────────┘
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ SnapshotBuilder  │──▶ HorizonResult
//!                         └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use rotagraph_core::{ErrorCategory, RrgError};
//!
//! fn describe(error: &RrgError) -> &'static str {
//!     match error.category() {
//!         ErrorCategory::BadRequest => "fix the request",
//!         ErrorCategory::DataUnavailable => "no usable data",
//!         ErrorCategory::InsufficientHistory => "fetch a longer history",
//!     }
//! }
//!
//! assert_eq!(describe(&RrgError::EmptyResult), "fetch a longer history");
//! ```

pub mod config;
pub mod domain;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod panel;
pub mod quadrant;
pub mod rolling;
pub mod snapshot;
pub mod transform;

pub use config::EngineConfig;
pub use domain::{BarSeries, DailyBar, Instrument, Symbol, TradingDate, Universe};
pub use engine::{RrgEngine, RrgRequest};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{ErrorCategory, RrgError, ValidationError};
pub use panel::{OscillatorPanel, Panel, PricePanel, RatioPanel};
pub use quadrant::{classify, Quadrant};
pub use rolling::RollingMean;
pub use snapshot::{
    build_snapshots, BenchmarkBar, DailySnapshot, HorizonResult, QuadrantCounts, SectorRecord,
    SnapshotBuilder, SnapshotParams, TailPoint,
};
pub use transform::{transform, RrgPanels, WindowParams, WindowPreset, PIVOT};
