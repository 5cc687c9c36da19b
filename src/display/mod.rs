//! Display formatting for terminal output
//!
//! Small helpers shared by the reports: signed deltas, percentages, bars,
//! sparklines, separators, and truncation.

pub mod format;

pub use format::{
    double_separator, format_bar, format_delta, format_percentage, separator, sparkline, truncate,
};
