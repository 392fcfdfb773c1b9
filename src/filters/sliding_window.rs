//! Fixed-capacity sliding window over scalar sensor readings
//!
//! The buffer grows until it holds `max_size` samples and afterwards keeps
//! only the most recent `max_size`. Mean and median are computed over a
//! suffix of the buffer selected by a window size.

use std::collections::VecDeque;

use crate::common::types::{Sample, Samples};
use crate::error::{FilterError, Result};

use super::Statistic;

/// Default number of samples retained
pub const DEFAULT_MAX_SIZE: usize = 5;

// Upper bound on slots reserved up front; larger buffers grow on demand
const MAX_PREALLOCATED: usize = 1024;

/// Sliding-window buffer with windowed mean and median
#[derive(Debug, Clone, PartialEq)]
pub struct SlidingWindowFilter {
    max_size: usize,
    data: VecDeque<Sample>,
}

impl SlidingWindowFilter {
    /// Create an empty filter keeping at most `max_size` samples.
    ///
    /// `max_size` must be odd and at least 3.
    pub fn new(max_size: usize) -> Result<Self> {
        if max_size < 3 {
            return Err(FilterError::InvalidArgument(format!(
                "max_size must be at least 3, got {}",
                max_size
            )));
        }
        if max_size % 2 == 0 {
            return Err(FilterError::InvalidArgument(format!(
                "max_size must be odd, got {}",
                max_size
            )));
        }

        Ok(Self::with_max_size(max_size))
    }

    fn with_max_size(max_size: usize) -> Self {
        tracing::debug!(max_size, "created sliding window filter");
        SlidingWindowFilter {
            max_size,
            data: VecDeque::with_capacity(max_size.min(MAX_PREALLOCATED)),
        }
    }

    /// Append one reading or a batch of readings, oldest first.
    pub fn append(&mut self, values: impl Into<Samples>) {
        match values.into() {
            Samples::Scalar(x) => self.push(x),
            Samples::Sequence(values) => self.extend(values),
        }
    }

    /// Append a single reading
    pub fn push(&mut self, x: Sample) {
        self.data.push_back(x);
        self.truncate();
    }

    // Keep only the most recent `max_size` samples
    fn truncate(&mut self) {
        let excess = self.data.len().saturating_sub(self.max_size);
        if excess > 0 {
            self.data.drain(..excess);
            tracing::trace!(evicted = excess, "dropped oldest samples");
        }
    }

    /// Copy of the buffer, oldest first
    pub fn window(&self) -> Vec<Sample> {
        self.data.iter().copied().collect()
    }

    /// Most recent reading as a one-element array
    pub fn last(&self) -> Result<[Sample; 1]> {
        self.data
            .back()
            .map(|&x| [x])
            .ok_or(FilterError::EmptyBuffer)
    }

    /// Arithmetic mean of the last `window_size` samples.
    ///
    /// A `window_size` of zero or less, or one larger than `max_size`,
    /// selects the whole buffer.
    pub fn mean(&self, window_size: i64) -> Result<f64> {
        let values = self.tail(window_size)?;
        let sum: f64 = values.iter().sum();
        Ok(sum / values.len() as f64)
    }

    /// Median of the last `window_size` samples.
    ///
    /// Uses the same window selection as [`mean`](Self::mean). Even windows
    /// are rejected since they have no single central sample.
    pub fn median(&self, window_size: i64) -> Result<f64> {
        if self.data.is_empty() {
            return Err(FilterError::EmptyBuffer);
        }
        let window = self.effective_window(window_size);
        if window % 2 == 0 {
            return Err(FilterError::InvalidArgument(format!(
                "median window size must be odd, got {}",
                window
            )));
        }

        let mut values = self.tail(window as i64)?;
        values.sort_by(|a, b| a.total_cmp(b));

        // A partially filled buffer may hold fewer samples than the window
        let n = values.len();
        if n % 2 == 1 {
            Ok(values[n / 2])
        } else {
            Ok((values[n / 2 - 1] + values[n / 2]) / 2.0)
        }
    }

    /// Compute the given statistic over the last `window_size` samples
    pub fn statistic(&self, statistic: Statistic, window_size: i64) -> Result<f64> {
        match statistic {
            Statistic::Mean => self.mean(window_size),
            Statistic::Median => self.median(window_size),
        }
    }

    /// Drop all samples, keeping `max_size`
    pub fn reset(&mut self) {
        self.data.clear();
        tracing::debug!(max_size = self.max_size, "sliding window filter reset");
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.data.len() == self.max_size
    }

    fn effective_window(&self, window_size: i64) -> usize {
        if window_size <= 0 || window_size as u64 > self.max_size as u64 {
            self.max_size
        } else {
            window_size as usize
        }
    }

    fn tail(&self, window_size: i64) -> Result<Vec<Sample>> {
        if self.data.is_empty() {
            return Err(FilterError::EmptyBuffer);
        }
        let window = self.effective_window(window_size).min(self.data.len());
        let start = self.data.len() - window;
        Ok(self.data.range(start..).copied().collect())
    }
}

impl Default for SlidingWindowFilter {
    fn default() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }
}

impl Extend<Sample> for SlidingWindowFilter {
    fn extend<I: IntoIterator<Item = Sample>>(&mut self, iter: I) {
        for x in iter {
            self.data.push_back(x);
        }
        self.truncate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_small_and_even_sizes() {
        for size in [0, 1, 2, 4, 6, 10] {
            assert!(matches!(
                SlidingWindowFilter::new(size),
                Err(FilterError::InvalidArgument(_))
            ));
        }
        assert!(SlidingWindowFilter::new(3).is_ok());
        assert!(SlidingWindowFilter::new(7).is_ok());
    }

    fn readings(range: std::ops::Range<i32>) -> Vec<f64> {
        range.map(f64::from).collect()
    }

    #[test]
    fn default_is_empty_with_five_slots() {
        let f = SlidingWindowFilter::default();
        assert_eq!(f.max_size(), 5);
        assert!(f.is_empty());
        assert!(f.window().is_empty());
        assert_eq!(f, SlidingWindowFilter::new(DEFAULT_MAX_SIZE).unwrap());
    }

    #[test]
    fn append_truncates_to_most_recent() {
        let mut f = SlidingWindowFilter::new(3).unwrap();
        f.append(1);
        assert_eq!(f.window(), vec![1.0]);
        f.append(2);
        assert_eq!(f.window(), vec![1.0, 2.0]);
        f.append(vec![3.0, 4.0]);
        assert_eq!(f.window(), vec![2.0, 3.0, 4.0]);
        assert!(f.is_full());
    }

    #[test]
    fn last_returns_newest() {
        let mut f = SlidingWindowFilter::new(3).unwrap();
        assert_eq!(f.last(), Err(FilterError::EmptyBuffer));
        f.append(readings(0..5));
        assert_eq!(f.last().unwrap(), [4.0]);
    }

    #[test]
    fn mean_window_selection() {
        let mut f = SlidingWindowFilter::new(5).unwrap();
        assert_eq!(f.mean(0), Err(FilterError::EmptyBuffer));
        f.append(readings(0..5));
        assert_eq!(f.mean(10).unwrap(), 2.0);
        assert_eq!(f.mean(-1).unwrap(), 2.0);
        assert_eq!(f.mean(3).unwrap(), 3.0);
        assert_eq!(f.mean(0).unwrap(), 2.0);
    }

    #[test]
    fn median_window_selection() {
        let mut f = SlidingWindowFilter::new(5).unwrap();
        assert_eq!(f.median(0), Err(FilterError::EmptyBuffer));
        f.append(readings(3..8));
        assert_eq!(f.median(9).unwrap(), 5.0);
        assert_eq!(f.median(-1).unwrap(), 5.0);
        assert!(matches!(f.median(4), Err(FilterError::InvalidArgument(_))));
        assert_eq!(f.median(3).unwrap(), 6.0);
        assert_eq!(f.median(0).unwrap(), 5.0);
    }

    #[test]
    fn median_of_partial_buffer_averages_middle_pair() {
        let mut f = SlidingWindowFilter::new(5).unwrap();
        f.append([10.0, 2.0]);
        assert_eq!(f.median(0).unwrap(), 6.0);
    }

    #[test]
    fn median_ignores_outlier() {
        let mut f = SlidingWindowFilter::new(3).unwrap();
        f.append([10.0, 11.0, 100.0]);
        assert_eq!(f.median(0).unwrap(), 11.0);
    }

    #[test]
    fn huge_odd_size_does_not_reserve_everything() {
        let mut f = SlidingWindowFilter::new(usize::MAX).unwrap();
        f.append([1.0, 2.0, 3.0]);
        assert_eq!(f.max_size(), usize::MAX);
        assert_eq!(f.mean(0).unwrap(), 2.0);
        assert!(!f.is_full());
    }

    #[test]
    fn reset_clears_samples() {
        let mut f = SlidingWindowFilter::new(3).unwrap();
        f.append(readings(0..3));
        f.reset();
        assert!(f.is_empty());
        assert_eq!(f.max_size(), 3);
    }
}
