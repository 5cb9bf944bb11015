//! Table catalog
//!
//! The known tables, in navigation order, with the column each one is
//! deleted by.

use crate::config::TableConfig;

/// Known tables and their primary key columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCatalog {
    tables: Vec<TableConfig>,
}

impl TableCatalog {
    pub fn new(tables: Vec<TableConfig>) -> Self {
        Self { tables }
    }

    /// Table names in navigation order
    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.iter().any(|t| t.name == table)
    }

    /// Configured key column of a table, if any
    pub fn key_column(&self, table: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|t| t.name == table)
            .and_then(|t| t.primary_key.as_deref())
    }
}

impl Default for TableCatalog {
    fn default() -> Self {
        Self::new(crate::config::default_tables())
    }
}
