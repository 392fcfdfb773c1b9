pub mod common;
pub mod config;
pub mod error;
pub mod filters;

pub use crate::common::types::{Sample, Samples};
pub use crate::config::FilterConfig;
pub use crate::error::{FilterError, Result};
pub use crate::filters::{Filter, SlidingWindowFilter, SmoothingFilter, Statistic};
