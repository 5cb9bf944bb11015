//! Row and record types

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Text shown for SQL NULL in listings
pub const NULL_TEXT: &str = "NULL";

/// A disposable projection of table rows, rebuilt on every refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display text of a cell
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|v| v.as_deref().unwrap_or(NULL_TEXT))
            .unwrap_or("")
    }

    /// Key of a row, read from its first column
    pub fn key_of(&self, row: usize) -> Option<&str> {
        self.rows.get(row)?.first()?.as_deref()
    }
}

/// A single row keyed by column name, in column order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub table: String,
    pub values: IndexMap<String, Option<String>>,
}

impl Record {
    pub fn new(table: &str, columns: &[String], values: Vec<Option<String>>) -> Self {
        Self {
            table: table.to_string(),
            values: columns.iter().cloned().zip(values).collect(),
        }
    }

    /// Value of a column, with NULL read as empty text
    pub fn text(&self, column: &str) -> &str {
        self.values
            .get(column)
            .and_then(|v| v.as_deref())
            .unwrap_or("")
    }
}
