//! Filtering algorithms for sensor data

mod sliding_window;

pub use sliding_window::{SlidingWindowFilter, DEFAULT_MAX_SIZE};

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{FilterError, Result};

/// A generic streaming filter interface
pub trait Filter<T> {
    /// Feed one input and return the filtered output
    fn filter(&mut self, input: T) -> Result<T>;

    /// Reset internal state to initial conditions
    fn reset(&mut self);
}

/// Statistic computed over the sample window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    #[default]
    Mean,
    Median,
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statistic::Mean => write!(f, "mean"),
            Statistic::Median => write!(f, "median"),
        }
    }
}

impl FromStr for Statistic {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" | "average" => Ok(Statistic::Mean),
            "median" => Ok(Statistic::Median),
            other => Err(FilterError::InvalidArgument(format!(
                "unknown statistic '{}'",
                other
            ))),
        }
    }
}

/// Streaming smoother: buffers each reading and returns the windowed statistic
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    buffer: SlidingWindowFilter,
    statistic: Statistic,
    window_size: i64,
}

impl SmoothingFilter {
    /// Create a new smoothing filter.
    ///
    /// A median over an even `window_size` is rejected up front so that
    /// [`Filter::filter`] only fails on genuinely bad input.
    pub fn new(max_size: usize, window_size: i64, statistic: Statistic) -> Result<Self> {
        let buffer = SlidingWindowFilter::new(max_size)?;
        if statistic == Statistic::Median
            && window_size > 0
            && window_size as u64 <= max_size as u64
            && window_size % 2 == 0
        {
            return Err(FilterError::InvalidArgument(format!(
                "median window size must be odd, got {}",
                window_size
            )));
        }

        Ok(SmoothingFilter {
            buffer,
            statistic,
            window_size,
        })
    }

    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    pub fn window_size(&self) -> i64 {
        self.window_size
    }

    /// Underlying sample buffer
    pub fn buffer(&self) -> &SlidingWindowFilter {
        &self.buffer
    }
}

impl Filter<f64> for SmoothingFilter {
    fn filter(&mut self, input: f64) -> Result<f64> {
        if !input.is_finite() {
            return Err(FilterError::InvalidArgument(format!(
                "non-finite sample {}",
                input
            )));
        }
        self.buffer.push(input);
        self.buffer.statistic(self.statistic, self.window_size)
    }

    fn reset(&mut self) {
        self.buffer.reset();
    }
}
