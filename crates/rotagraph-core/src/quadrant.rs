use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::transform::PIVOT;

/// Rotation phase of an instrument relative to its benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// Strong and strengthening: ratio >= 100, momentum >= 100.
    Leading,
    /// Weak but strengthening: ratio < 100, momentum >= 100.
    Improving,
    /// Weak and weakening: ratio < 100, momentum < 100.
    Lagging,
    /// Strong but weakening: ratio >= 100, momentum < 100.
    Weakening,
    #[serde(rename = "N/A")]
    Undefined,
}

impl Quadrant {
    pub const ALL: [Self; 4] = [Self::Leading, Self::Improving, Self::Lagging, Self::Weakening];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leading => "Leading",
            Self::Improving => "Improving",
            Self::Lagging => "Lagging",
            Self::Weakening => "Weakening",
            Self::Undefined => "N/A",
        }
    }
}

impl Display for Quadrant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a (RS-Ratio, RS-Momentum) point against the pivot; values on the
/// pivot count as the upper side.
pub fn classify(rs_ratio: Option<f64>, rs_momentum: Option<f64>) -> Quadrant {
    let (Some(ratio), Some(momentum)) = (
        rs_ratio.filter(|value| value.is_finite()),
        rs_momentum.filter(|value| value.is_finite()),
    ) else {
        return Quadrant::Undefined;
    };

    match (ratio >= PIVOT, momentum >= PIVOT) {
        (true, true) => Quadrant::Leading,
        (false, true) => Quadrant::Improving,
        (false, false) => Quadrant::Lagging,
        (true, false) => Quadrant::Weakening,
    }
}
