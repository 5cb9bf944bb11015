//! Schema module for GradRecords
//!
//! This module discovers table columns at runtime.

pub mod analyzer;
pub mod types;

// Re-export key types
pub use analyzer::SchemaAnalyzer;
pub use types::{Column, TableSchema};
