//! SQL dialect differences
//!
//! Both supported backends share `?` placeholders and backtick quoting; they
//! differ only in cast syntax and in how columns are introspected.

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    /// Cast an expression to text so any column can be shown as a string
    pub fn as_text(&self, expr: &str) -> String {
        match self {
            Dialect::MySql => format!("CAST({} AS CHAR)", expr),
            Dialect::Sqlite => format!("CAST({} AS TEXT)", expr),
        }
    }

    /// Cast an expression to a 64-bit integer
    pub fn as_integer(&self, expr: &str) -> String {
        match self {
            Dialect::MySql => format!("CAST({} AS SIGNED)", expr),
            Dialect::Sqlite => format!("CAST({} AS INTEGER)", expr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn casts() {
        assert_eq!(Dialect::MySql.as_text("`a`"), "CAST(`a` AS CHAR)");
        assert_eq!(Dialect::Sqlite.as_text("`a`"), "CAST(`a` AS TEXT)");
        assert_eq!(Dialect::MySql.as_integer("MAX(`id`)"), "CAST(MAX(`id`) AS SIGNED)");
        assert_eq!(Dialect::Sqlite.as_integer("1"), "CAST(1 AS INTEGER)");
    }
}
