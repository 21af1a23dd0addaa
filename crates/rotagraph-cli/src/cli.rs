//! CLI argument definitions for rotagraph.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `compute` | Full horizon of daily RRG snapshots |
//! | `latest` | Only the snapshot on the last horizon date |
//! | `universe` | Built-in TOPIX-17 sector universe |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, ndjson, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--log-level` | `warn` | Log filter when `RUST_LOG` is unset |
//!
//! # Examples
//!
//! ```bash
//! rotagraph compute --input bars.json --benchmark 1306.T --pretty
//! rotagraph latest --input bars.json --benchmark 1306.T --date 2025-08-29 --format table
//! rotagraph compute --input bars.json --benchmark 1306.T --preset classic --tail 10
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rotagraph_core::WindowPreset;

/// Relative Rotation Graph analytics over daily bar series.
#[derive(Debug, Parser)]
#[command(
    name = "rotagraph",
    author,
    version,
    about = "Relative Rotation Graph analytics",
    long_about = "rotagraph classifies instruments into Leading, Weakening, Lagging and \
Improving quadrants against a benchmark, using RS-Ratio and RS-Momentum derived from daily \
closes.\n\
\n\
Use 'rotagraph <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute daily snapshots over the lookback horizon.
    ///
    /// # Examples
    ///
    ///   rotagraph compute --input bars.json --benchmark 1306.T
    ///   rotagraph compute --input bars.json --benchmark 1306.T --instrument 1631.T --instrument 1633.T
    Compute(ComputeArgs),

    /// Show the latest snapshot with per-quadrant counts.
    Latest(ComputeArgs),

    /// List the built-in sector universe.
    Universe,
}

#[derive(Debug, Clone, Args)]
pub struct ComputeArgs {
    /// JSON file holding an array of bar series.
    #[arg(long)]
    pub input: PathBuf,

    /// Benchmark symbol; must be one of the input series.
    #[arg(long)]
    pub benchmark: String,

    /// Instrument to include (repeatable); defaults to every non-benchmark series.
    #[arg(long = "instrument")]
    pub instruments: Vec<String>,

    /// Target date (YYYY-MM-DD); defaults to the latest date in the input.
    #[arg(long)]
    pub date: Option<String>,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

/// Overrides for `ROTAGRAPH_*` settings.
#[derive(Debug, Clone, Default, Args)]
pub struct TuningArgs {
    /// Window preset.
    #[arg(long, value_enum)]
    pub preset: Option<PresetArg>,

    /// Moving-average window for RS-Ratio.
    #[arg(long)]
    pub ratio_window: Option<usize>,

    /// Observations back for the RS-Momentum rate of change.
    #[arg(long)]
    pub momentum_period: Option<usize>,

    /// Moving-average window smoothing the RS-Momentum rate of change.
    #[arg(long)]
    pub momentum_window: Option<usize>,

    /// Number of trailing defined dates to emit snapshots for.
    #[arg(long)]
    pub lookback: Option<usize>,

    /// Maximum number of points in each tail.
    #[arg(long)]
    pub tail: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PresetArg {
    /// 60/5/10
    ShortTerm,
    /// 52/4/13
    Classic,
}

impl From<PresetArg> for WindowPreset {
    fn from(value: PresetArg) -> Self {
        match value {
            PresetArg::ShortTerm => WindowPreset::ShortTerm,
            PresetArg::Classic => WindowPreset::Classic,
        }
    }
}
