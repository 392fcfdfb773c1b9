//! Error types for sensor smoothing

use thiserror::Error;

/// Errors raised by the sliding-window filter and its configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    /// A size, window or parameter value was rejected
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A statistic was requested before any sample was appended
    #[error("no data in buffer")]
    EmptyBuffer,

    /// A configuration file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
