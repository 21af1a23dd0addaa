mod compute;
mod latest;
mod universe;

use rotagraph_core::{Envelope, EnvelopeError, RrgError, SCHEMA_VERSION};
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::Metadata;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
        }
    }

    /// Engine failures still produce an envelope; `data` is null.
    pub fn failed(error: &RrgError) -> Self {
        Self {
            data: Value::Null,
            warnings: Vec::new(),
            errors: vec![EnvelopeError::from(error)],
            latency_ms: 0,
        }
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let command_result = match &cli.command {
        Command::Compute(args) => compute::run(args)?,
        Command::Latest(args) => latest::run(args)?,
        Command::Universe => universe::run()?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
    } = command_result;

    let mut metadata = Metadata::new(latency_ms);
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta(SCHEMA_VERSION)?;

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}
