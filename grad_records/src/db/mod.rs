//! Database module for GradRecords
//!
//! This module handles the shared connection and dialect differences.

pub mod connection;
pub mod dialect;

// Re-export key types
pub use connection::{DatabaseConnection, TextRows};
pub use dialect::Dialect;
