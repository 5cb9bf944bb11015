//! Records module for GradRecords
//!
//! This module lists, searches, and edits table rows.

pub mod browser;
pub mod editor;
pub mod query;
pub mod store;
pub mod types;

// Re-export key types
pub use browser::{SearchOutcome, TableBrowser};
pub use editor::{FormField, FormMode, RecordEditor, RecordForm, SubmitOutcome};
pub use query::{QueryBuilder, Statement};
pub use store::RecordStore;
pub use types::{Record, RowSet};
