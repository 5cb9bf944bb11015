//! Type definitions for discovered table schemas

use serde::{Deserialize, Serialize};

/// Represents a table column as reported by the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
    pub is_primary_key: bool,
}

impl Column {
    /// Create a nullable, non-key column
    pub fn new(name: &str, data_type: &str) -> Self {
        Self {
            name: name.to_string(),
            data_type: data_type.to_string(),
            nullable: true,
            is_primary_key: false,
        }
    }
}

/// A table and its columns in ordinal order.
///
/// The first column is the record key. It is assigned once and never
/// edited; every other column is editable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Create a schema with no columns
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
        }
    }

    /// Add a column to the table
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// The key column, if the table has any columns
    pub fn key_column(&self) -> Option<&Column> {
        self.columns.first()
    }

    /// Every column after the key
    pub fn editable_columns(&self) -> &[Column] {
        self.columns.get(1..).unwrap_or(&[])
    }

    /// All column names in order
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Names of the editable columns in order
    pub fn editable_names(&self) -> Vec<String> {
        self.editable_columns().iter().map(|c| c.name.clone()).collect()
    }
}
