//! Utilities for GradRecords
//!
//! This module provides identifier handling and logging setup.

pub mod logging;
pub mod naming;

// Re-export key utility functions
pub use naming::{quote_all, quote_identifier, validate_identifier};
