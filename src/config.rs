//! Filter configuration
//!
//! Parameters can come from a TOML file or from a numeric parameter map,
//! e.g.
//!
//! ```toml
//! max_size = 7
//! window_size = 3
//! statistic = "median"
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{FilterError, Result};
use crate::filters::{SlidingWindowFilter, SmoothingFilter, Statistic, DEFAULT_MAX_SIZE};

/// Settings for building a smoothing filter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    pub max_size: usize,
    /// Zero selects the whole buffer
    pub window_size: i64,
    pub statistic: Statistic,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            max_size: DEFAULT_MAX_SIZE,
            window_size: 0,
            statistic: Statistic::Mean,
        }
    }
}

impl FilterConfig {
    /// Configure the filter with parameters
    ///
    /// Recognised keys are `max_size`, `window_size` and `statistic`
    /// (0 = mean, 1 = median). Values must be integral.
    pub fn configure(&mut self, params: &HashMap<String, f64>) -> Result<()> {
        if let Some(&max_size) = params.get("max_size") {
            let max_size = integral("max_size", max_size)?;
            if max_size < 3 || max_size % 2 == 0 {
                return Err(FilterError::InvalidArgument(format!(
                    "max_size must be an odd integer of at least 3, got {}",
                    max_size
                )));
            }
            self.max_size = max_size as usize;
        }

        if let Some(&window_size) = params.get("window_size") {
            self.window_size = integral("window_size", window_size)?;
        }

        if let Some(&statistic) = params.get("statistic") {
            self.statistic = match integral("statistic", statistic)? {
                0 => Statistic::Mean,
                1 => Statistic::Median,
                other => {
                    return Err(FilterError::InvalidArgument(format!(
                        "statistic must be 0 (mean) or 1 (median), got {}",
                        other
                    )))
                }
            };
        }

        for key in params.keys() {
            if !matches!(key.as_str(), "max_size" | "window_size" | "statistic") {
                tracing::warn!("ignoring unknown filter parameter '{}'", key);
            }
        }

        Ok(())
    }

    /// Build an empty sample buffer
    pub fn build_buffer(&self) -> Result<SlidingWindowFilter> {
        SlidingWindowFilter::new(self.max_size)
    }

    /// Build a streaming smoother
    pub fn build(&self) -> Result<SmoothingFilter> {
        if self.window_size <= 0 || self.window_size as u64 > self.max_size as u64 {
            tracing::debug!(
                window_size = self.window_size,
                max_size = self.max_size,
                "window covers the whole buffer"
            );
        }
        SmoothingFilter::new(self.max_size, self.window_size, self.statistic)
    }
}

fn integral(name: &str, value: f64) -> Result<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(FilterError::InvalidArgument(format!(
            "{} must be an integer, got {}",
            name, value
        )));
    }
    // Casts beyond the i64 range saturate
    if value.abs() >= i64::MAX as f64 {
        return Err(FilterError::InvalidArgument(format!(
            "{} is out of range, got {}",
            name, value
        )));
    }
    Ok(value as i64)
}

/// Parse a configuration from TOML text
pub fn parse(raw: &str) -> Result<FilterConfig> {
    toml::from_str(raw).map_err(|e| FilterError::Config(format!("TOML parse error: {e}")))
}

/// Load configuration from a TOML file. Returns `FilterConfig::default()`
/// if the file doesn't exist.
pub fn load(path: impl AsRef<Path>) -> Result<FilterConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            path = %path.display(),
            "no filter config found, smoothing with max_size={} window_size=0 statistic=mean",
            DEFAULT_MAX_SIZE
        );
        return Ok(FilterConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| FilterError::Config(format!("cannot read '{}': {e}", path.display())))?;
    parse(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn configure_applies_values() {
        let mut config = FilterConfig::default();
        config
            .configure(&params(&[("max_size", 7.0), ("window_size", 3.0), ("statistic", 1.0)]))
            .unwrap();
        assert_eq!(config.max_size, 7);
        assert_eq!(config.window_size, 3);
        assert_eq!(config.statistic, Statistic::Median);
    }

    #[test]
    fn configure_rejects_fractional_window() {
        let mut config = FilterConfig::default();
        let err = config.configure(&params(&[("window_size", 1.5)])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));
        assert_eq!(config.window_size, 0);
    }

    #[test]
    fn configure_rejects_even_max_size() {
        let mut config = FilterConfig::default();
        assert!(config.configure(&params(&[("max_size", 4.0)])).is_err());
        assert_eq!(config.max_size, DEFAULT_MAX_SIZE);
    }

    #[test]
    fn configure_rejects_values_beyond_i64() {
        let mut config = FilterConfig::default();
        let err = config.configure(&params(&[("max_size", 1e30)])).unwrap_err();
        assert!(matches!(err, FilterError::InvalidArgument(_)));
        assert!(config.configure(&params(&[("window_size", -1e19)])).is_err());
        assert_eq!(config, FilterConfig::default());
        assert!(config.build_buffer().is_ok());
    }

    #[test]
    fn parse_toml() {
        let config = parse("max_size = 9\nstatistic = \"median\"\n").unwrap();
        assert_eq!(config.max_size, 9);
        assert_eq!(config.window_size, 0);
        assert_eq!(config.statistic, Statistic::Median);
        assert!(matches!(parse("max_size = \"big\""), Err(FilterError::Config(_))));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load("/nonexistent/sensor_smoothing.toml").unwrap();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn build_validates_sizes() {
        let config = FilterConfig {
            max_size: 4,
            ..FilterConfig::default()
        };
        assert!(config.build().is_err());
        assert_eq!(FilterConfig::default().build_buffer().unwrap().max_size(), 5);
    }
}
