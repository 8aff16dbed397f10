//! Utility functions for display formatting.

pub mod format;

pub use format::{format_score, format_timestamp, nanos_to_datetime};
