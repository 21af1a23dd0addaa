//! Trailing-window accumulators.

use std::collections::VecDeque;

/// Simple moving average over the last `window` observations, maintained
/// with a running sum so each step is O(1) amortized.
///
/// The mean is only reported once `window` consecutive defined observations
/// have been pushed; an undefined observation empties the window.
#[derive(Debug, Clone)]
pub struct RollingMean {
    window: usize,
    buffer: VecDeque<f64>,
    sum: f64,
}

impl RollingMean {
    /// `window` must be at least 1.
    pub fn new(window: usize) -> Self {
        Self {
            window,
            buffer: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Feed the next observation and return the mean of the window ending at
    /// it, if the window is full.
    pub fn push(&mut self, value: Option<f64>) -> Option<f64> {
        let Some(value) = value.filter(|value| value.is_finite()) else {
            self.reset();
            return None;
        };

        self.buffer.push_back(value);
        self.sum += value;
        if self.buffer.len() > self.window {
            if let Some(evicted) = self.buffer.pop_front() {
                self.sum -= evicted;
            }
        }

        if self.window > 0 && self.buffer.len() == self.window {
            finite(self.sum / self.window as f64)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.sum = 0.0;
    }
}

/// Apply a [`RollingMean`] over a whole series.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut mean = RollingMean::new(window);
    values.iter().map(|value| mean.push(*value)).collect()
}

/// `numerator / denominator`, undefined for a zero denominator or any
/// non-finite outcome.
pub fn checked_div(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    finite(numerator / denominator)
}

pub(crate) fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_mean_once_window_is_full() {
        let means = rolling_mean(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)], 3);
        assert_eq!(means, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn gap_restarts_the_window() {
        let means = rolling_mean(
            &[Some(1.0), Some(2.0), None, Some(4.0), Some(6.0), Some(8.0)],
            2,
        );
        assert_eq!(means, vec![None, Some(1.5), None, None, Some(5.0), Some(7.0)]);
    }

    #[test]
    fn non_finite_input_counts_as_gap() {
        let means = rolling_mean(&[Some(1.0), Some(f64::INFINITY), Some(3.0)], 1);
        assert_eq!(means, vec![Some(1.0), None, Some(3.0)]);
    }

    #[test]
    fn window_of_one_is_identity() {
        let means = rolling_mean(&[Some(5.0), None, Some(7.0)], 1);
        assert_eq!(means, vec![Some(5.0), None, Some(7.0)]);
    }

    #[test]
    fn checked_div_rejects_zero_and_overflow() {
        assert_eq!(checked_div(1.0, 0.0), None);
        assert_eq!(checked_div(f64::MAX, f64::MIN_POSITIVE), None);
        assert_eq!(checked_div(3.0, 2.0), Some(1.5));
    }
}
