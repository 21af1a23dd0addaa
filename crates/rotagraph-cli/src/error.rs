use std::path::PathBuf;

use rotagraph_core::ErrorCategory;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] rotagraph_core::ValidationError),

    #[error("cannot read input '{}': {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input '{}' is not a JSON array of bar series: {source}", .path.display())]
    InputFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("strict mode failed: warnings={warning_count}, errors={error_count}")]
    StrictModeViolation {
        warning_count: usize,
        error_count: usize,
    },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::InputFormat { .. } => 2,
            Self::StrictModeViolation { .. } => 5,
            Self::Serialization(_) => 4,
            Self::Input { .. } | Self::Io(_) => 10,
        }
    }
}

/// Exit code for a request that completed with an envelope error.
pub const fn category_exit_code(category: Option<ErrorCategory>) -> u8 {
    match category {
        Some(ErrorCategory::BadRequest) => 2,
        Some(ErrorCategory::DataUnavailable) | None => 3,
        Some(ErrorCategory::InsufficientHistory) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_categories_to_exit_codes() {
        assert_eq!(category_exit_code(Some(ErrorCategory::BadRequest)), 2);
        assert_eq!(category_exit_code(Some(ErrorCategory::DataUnavailable)), 3);
        assert_eq!(category_exit_code(Some(ErrorCategory::InsufficientHistory)), 4);
        assert_eq!(category_exit_code(None), 3);
    }

    #[test]
    fn strict_mode_has_its_own_exit_code() {
        let error = CliError::StrictModeViolation {
            warning_count: 1,
            error_count: 0,
        };
        assert_eq!(error.exit_code(), 5);
    }
}
