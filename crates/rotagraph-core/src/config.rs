//! Engine tunables with documented defaults and environment overrides.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ROTAGRAPH_PRESET` | `short-term` |
//! | `ROTAGRAPH_RATIO_WINDOW` | preset value (60) |
//! | `ROTAGRAPH_MOMENTUM_CHANGE_PERIOD` | preset value (5) |
//! | `ROTAGRAPH_MOMENTUM_SMOOTHING_WINDOW` | preset value (10) |
//! | `ROTAGRAPH_LOOKBACK_DAYS` | 60 |
//! | `ROTAGRAPH_TAIL_CAP` | 20 |
//!
//! Unset, blank, or unparseable variables fall back to the default.

use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{RrgError, SnapshotParams, WindowParams, WindowPreset};

pub const ENV_PRESET: &str = "ROTAGRAPH_PRESET";
pub const ENV_RATIO_WINDOW: &str = "ROTAGRAPH_RATIO_WINDOW";
pub const ENV_MOMENTUM_CHANGE_PERIOD: &str = "ROTAGRAPH_MOMENTUM_CHANGE_PERIOD";
pub const ENV_MOMENTUM_SMOOTHING_WINDOW: &str = "ROTAGRAPH_MOMENTUM_SMOOTHING_WINDOW";
pub const ENV_LOOKBACK_DAYS: &str = "ROTAGRAPH_LOOKBACK_DAYS";
pub const ENV_TAIL_CAP: &str = "ROTAGRAPH_TAIL_CAP";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub windows: WindowParams,
    pub snapshot: SnapshotParams,
}

impl EngineConfig {
    pub const fn new(windows: WindowParams, snapshot: SnapshotParams) -> Self {
        Self { windows, snapshot }
    }

    pub fn from_preset(preset: WindowPreset) -> Self {
        Self::new(preset.params(), SnapshotParams::default())
    }

    /// Defaults overridden by `ROTAGRAPH_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`EngineConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_owned())
                .filter(|raw| !raw.is_empty())
        };
        let number = |name: &str, default: usize| {
            value(name)
                .and_then(|raw| match raw.parse::<usize>() {
                    Ok(parsed) => Some(parsed),
                    Err(_) => {
                        warn!(variable = name, value = %raw, "ignoring unparseable setting");
                        None
                    }
                })
                .unwrap_or(default)
        };

        let preset = value(ENV_PRESET)
            .and_then(|raw| match raw.parse::<WindowPreset>() {
                Ok(preset) => Some(preset),
                Err(error) => {
                    warn!(variable = ENV_PRESET, %error, "ignoring unknown preset");
                    None
                }
            })
            .unwrap_or(WindowPreset::ShortTerm);
        let base = preset.params();
        let snapshot = SnapshotParams::default();

        Self {
            windows: WindowParams::new(
                number(ENV_RATIO_WINDOW, base.ratio_window),
                number(ENV_MOMENTUM_CHANGE_PERIOD, base.momentum_change_period),
                number(ENV_MOMENTUM_SMOOTHING_WINDOW, base.momentum_smoothing_window),
            ),
            snapshot: SnapshotParams::new(
                number(ENV_LOOKBACK_DAYS, snapshot.lookback_days),
                number(ENV_TAIL_CAP, snapshot.tail_cap),
            ),
        }
    }

    pub fn validate(&self) -> Result<(), RrgError> {
        self.windows.validate()?;
        self.snapshot.validate()
    }
}
