//! Machine-readable response wrapper shared by every `rotagraph` output.
//!
//! ```json
//! {"meta": {"request_id": "...", "schema_version": "v1.0.0",
//!           "generated_at": "2025-08-29T06:00:00Z", "latency_ms": 4},
//!  "data": {...},
//!  "errors": [{"code": "no_rrg_data", "message": "...", "category": "data_unavailable"}]}
//! ```

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::{ErrorCategory, RrgError, ValidationError};

pub const SCHEMA_VERSION: &str = "v1.0.0";

const MIN_REQUEST_ID_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    /// Envelope carrying request errors; meta and every error are checked.
    pub fn with_errors(
        meta: EnvelopeMeta,
        data: T,
        errors: Vec<EnvelopeError>,
    ) -> Result<Self, ValidationError> {
        meta.validate()?;
        errors.iter().try_for_each(EnvelopeError::validate)?;
        Ok(Self { meta, data, errors })
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub schema_version: String,
    /// RFC3339, UTC.
    pub generated_at: String,
    pub latency_ms: u64,
    /// Non-fatal conditions such as a clamped target date.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    pub fn new(
        request_id: impl Into<String>,
        schema_version: impl Into<String>,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| String::from("1970-01-01T00:00:00Z"));
        let meta = Self {
            request_id: request_id.into(),
            schema_version: schema_version.into(),
            generated_at,
            latency_ms,
            warnings: Vec::new(),
        };
        meta.validate()?;
        Ok(meta)
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.request_id.trim().len() < MIN_REQUEST_ID_LEN {
            return Err(ValidationError::InvalidRequestId);
        }
        if parse_schema_version(&self.schema_version).is_none() {
            return Err(ValidationError::InvalidSchemaVersion {
                value: self.schema_version.clone(),
            });
        }
        Ok(())
    }
}

/// One request failure, as reported to machine consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
}

impl EnvelopeError {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.code.trim().is_empty() {
            Err(ValidationError::EmptyErrorCode)
        } else if self.message.trim().is_empty() {
            Err(ValidationError::EmptyErrorMessage)
        } else {
            Ok(())
        }
    }
}

impl From<&RrgError> for EnvelopeError {
    fn from(error: &RrgError) -> Self {
        Self {
            code: error.code().to_owned(),
            message: error.to_string(),
            category: Some(error.category()),
        }
    }
}

/// `vMAJOR.MINOR.PATCH` → `(major, minor, patch)`.
fn parse_schema_version(value: &str) -> Option<(u64, u64, u64)> {
    let mut parts = value.strip_prefix('v')?.split('.').map(|part| {
        if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
            None
        } else {
            part.parse::<u64>().ok()
        }
    });
    let version = (parts.next()??, parts.next()??, parts.next()??);
    parts.next().is_none().then_some(version)
}
