//! SQL statement builders
//!
//! Identifiers are validated and quoted here; every value travels as a
//! bound parameter. Selected columns are cast to text so rows of any shape
//! decode into strings.

use crate::db::dialect::Dialect;
use crate::error::Result;
use crate::utils::naming::{quote_all, quote_identifier};

/// Escape character used in LIKE patterns
pub const LIKE_ESCAPE: char = '!';

/// A statement together with its bound values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<String>,
}

impl Statement {
    fn new(sql: String, binds: Vec<String>) -> Self {
        Self { sql, binds }
    }
}

/// Builds statements for one table in one dialect
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dialect: Dialect,
    table: String,
}

impl QueryBuilder {
    pub fn new(dialect: Dialect, table: &str) -> Result<Self> {
        Ok(Self {
            dialect,
            table: quote_identifier(table)?,
        })
    }

    fn projection(&self, columns: &[String]) -> Result<String> {
        Ok(quote_all(columns)?
            .iter()
            .map(|c| format!("{} AS {}", self.dialect.as_text(c), c))
            .collect::<Vec<_>>()
            .join(", "))
    }

    /// Every row, ordered by the key column
    pub fn select_all(&self, columns: &[String]) -> Result<Statement> {
        let order = quote_identifier(first(columns)?)?;
        Ok(Statement::new(
            format!(
                "SELECT {} FROM {} ORDER BY {}",
                self.projection(columns)?,
                self.table,
                order
            ),
            Vec::new(),
        ))
    }

    /// The row whose key column equals `key`
    pub fn select_by_key(&self, columns: &[String], key: &str) -> Result<Statement> {
        let key_column = quote_identifier(first(columns)?)?;
        Ok(Statement::new(
            format!(
                "SELECT {} FROM {} WHERE {} = ?",
                self.projection(columns)?,
                self.table,
                key_column
            ),
            vec![key.to_string()],
        ))
    }

    /// Rows where any column contains `term`, ignoring case
    pub fn search(&self, columns: &[String], term: &str) -> Result<Statement> {
        let quoted = quote_all(columns)?;
        let order = quote_identifier(first(columns)?)?;
        let conditions = quoted
            .iter()
            .map(|c| {
                format!(
                    "LOWER({}) LIKE ? ESCAPE '{}'",
                    self.dialect.as_text(c),
                    LIKE_ESCAPE
                )
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        let pattern = like_pattern(term);

        Ok(Statement::new(
            format!(
                "SELECT {} FROM {} WHERE {} ORDER BY {}",
                self.projection(columns)?,
                self.table,
                conditions,
                order
            ),
            vec![pattern; quoted.len()],
        ))
    }

    /// Largest key in the table as an integer, 0 when the table is empty
    pub fn max_key(&self, key_column: &str) -> Result<Statement> {
        let max = format!("COALESCE(MAX({}), 0)", quote_identifier(key_column)?);
        Ok(Statement::new(
            format!("SELECT {} FROM {}", self.dialect.as_integer(&max), self.table),
            Vec::new(),
        ))
    }

    /// Count rows whose editable columns equal `values`.
    ///
    /// With `exclude_key` the row being edited is left out. Returns `None`
    /// when there are no editable columns to compare.
    pub fn count_duplicates(
        &self,
        key_column: &str,
        columns: &[String],
        values: &[String],
        exclude_key: Option<&str>,
    ) -> Result<Option<Statement>> {
        if columns.is_empty() {
            return Ok(None);
        }

        let mut conditions: Vec<String> = quote_all(columns)?
            .into_iter()
            .map(|c| format!("{} = ?", c))
            .collect();
        let mut binds = values.to_vec();

        if let Some(key) = exclude_key {
            conditions.push(format!("{} <> ?", quote_identifier(key_column)?));
            binds.push(key.to_string());
        }

        Ok(Some(Statement::new(
            format!(
                "SELECT COUNT(*) FROM {} WHERE {}",
                self.table,
                conditions.join(" AND ")
            ),
            binds,
        )))
    }

    /// Insert one row covering every column
    pub fn insert(&self, columns: &[String], values: &[String]) -> Result<Statement> {
        let placeholders = vec!["?"; columns.len()].join(", ");
        Ok(Statement::new(
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.table,
                quote_all(columns)?.join(", "),
                placeholders
            ),
            values.to_vec(),
        ))
    }

    /// Overwrite the editable columns of the row with `key`
    pub fn update(
        &self,
        key_column: &str,
        columns: &[String],
        values: &[String],
        key: &str,
    ) -> Result<Statement> {
        let assignments = quote_all(columns)?
            .into_iter()
            .map(|c| format!("{} = ?", c))
            .collect::<Vec<_>>()
            .join(", ");
        let mut binds = values.to_vec();
        binds.push(key.to_string());

        Ok(Statement::new(
            format!(
                "UPDATE {} SET {} WHERE {} = ?",
                self.table,
                assignments,
                quote_identifier(key_column)?
            ),
            binds,
        ))
    }

    /// Remove the row with `key`
    pub fn delete(&self, key_column: &str, key: &str) -> Result<Statement> {
        Ok(Statement::new(
            format!(
                "DELETE FROM {} WHERE {} = ?",
                self.table,
                quote_identifier(key_column)?
            ),
            vec![key.to_string()],
        ))
    }
}

/// Build a case-folded substring pattern with wildcards escaped
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if c == '%' || c == '_' || c == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn first(columns: &[String]) -> Result<&str> {
    columns
        .first()
        .map(String::as_str)
        .ok_or_else(|| crate::error::Error::DatabaseError("Table has no columns".to_string()))
}
