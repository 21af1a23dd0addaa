use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TradingDate;

/// Validation and contract errors exposed by `rotagraph-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter, digit or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be strictly positive")]
    NonPositiveValue { field: &'static str },

    #[error("bar high must be >= low")]
    InvalidBarRange,
    #[error("bar open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedDates { previous: TradingDate, next: TradingDate },
    #[error("symbol '{symbol}' appears more than once")]
    DuplicateSymbol { symbol: String },
    #[error("column '{symbol}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Coarse classification of request failures, so callers can tell a bad
/// request apart from missing data and from short history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    BadRequest,
    DataUnavailable,
    InsufficientHistory,
}

impl ErrorCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BadRequest => "bad_request",
            Self::DataUnavailable => "data_unavailable",
            Self::InsufficientHistory => "insufficient_history",
        }
    }
}

/// Request-level failures of the analytics engine. All are terminal for the
/// request and none is retried internally.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RrgError {
    #[error("invalid target date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("benchmark '{benchmark}' is not present in the price panel")]
    MissingBenchmark { benchmark: String },

    #[error("benchmark '{benchmark}' has no usable price history")]
    EmptyBenchmarkSeries { benchmark: String },

    #[error("price panel has no usable rows")]
    EmptyInput,

    #[error("history is too short for any rolling window to produce a value")]
    EmptyResult,

    #[error("no RRG data is available on or before {target_date}")]
    NoRrgData { target_date: TradingDate },

    #[error("ratio, momentum and price panels must share one date index")]
    IndexMismatch,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RrgError {
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDate { .. }
            | Self::InvalidParameter { .. }
            | Self::IndexMismatch
            | Self::Validation(_) => ErrorCategory::BadRequest,
            Self::EmptyResult => ErrorCategory::InsufficientHistory,
            Self::MissingBenchmark { .. }
            | Self::EmptyBenchmarkSeries { .. }
            | Self::EmptyInput
            | Self::NoRrgData { .. } => ErrorCategory::DataUnavailable,
        }
    }

    /// Stable machine-readable code for envelopes and logs.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidDate { .. } => "invalid_date",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::MissingBenchmark { .. } => "missing_benchmark",
            Self::EmptyBenchmarkSeries { .. } => "empty_benchmark_series",
            Self::EmptyInput => "empty_input",
            Self::EmptyResult => "empty_result",
            Self::NoRrgData { .. } => "no_rrg_data",
            Self::IndexMismatch => "index_mismatch",
            Self::Validation(_) => "validation",
        }
    }
}
