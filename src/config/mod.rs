//! Configuration module for Envelope Triage
//!
//! This module provides configuration management including:
//! - The immutable `BudgetConfig` threaded into every computation
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod budget;
pub mod paths;
pub mod settings;

pub use budget::BudgetConfig;
pub use paths::TriagePaths;
pub use settings::{InputFiles, Settings};
