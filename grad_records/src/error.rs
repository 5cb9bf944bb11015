//! Error types for GradRecords

use thiserror::Error;

/// Result type for GradRecords operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for GradRecords
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Table '{0}' does not exist.")]
    MissingTable(String),

    #[error("Record with key '{key}' not found in {table}")]
    RecordNotFound { table: String, key: String },

    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    #[error("Field '{0}' cannot be empty.")]
    EmptyField(String),

    #[error("A record with the same data already exists.")]
    DuplicateRecord,

    #[error("Select a record first.")]
    NoSelection,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl Error {
    /// Whether this error is a rejected user input rather than a failure.
    ///
    /// Validation errors are shown as warnings and leave the dialog open.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyField(_) | Error::DuplicateRecord | Error::NoSelection
        )
    }

    /// Classify a raw driver error for the given table.
    ///
    /// MySQL reports a missing table with SQLSTATE `42S02`, SQLite only
    /// through its message text.
    pub fn from_query(table: &str, error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_error) = &error {
            let missing = db_error.code().as_deref() == Some("42S02")
                || db_error.message().contains("no such table");
            if missing {
                return Error::MissingTable(table.to_string());
            }
        }
        Error::SqlxError(error)
    }
}

/// Convert TOML deserialization errors to GradRecords errors
impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Error::ConfigError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_flagged() {
        assert!(Error::EmptyField("Name".into()).is_validation());
        assert!(Error::DuplicateRecord.is_validation());
        assert!(Error::NoSelection.is_validation());
        assert!(!Error::MissingTable("Graduates".into()).is_validation());
        assert!(!Error::DatabaseError("boom".into()).is_validation());
    }

    #[test]
    fn messages_match_dialog_text() {
        assert_eq!(
            Error::EmptyField("First_Name".into()).to_string(),
            "Field 'First_Name' cannot be empty."
        );
        assert_eq!(
            Error::MissingTable("Donations".into()).to_string(),
            "Table 'Donations' does not exist."
        );
    }

    #[test]
    fn non_database_errors_are_not_missing_table() {
        let error = Error::from_query("Graduates", sqlx::Error::RowNotFound);
        assert!(matches!(error, Error::SqlxError(sqlx::Error::RowNotFound)));
    }
}
