//! Table schema analyzer
//!
//! Columns are discovered every time a browser refreshes or a dialog opens,
//! so edits made to the schema outside the program are picked up without a
//! restart.

use async_trait::async_trait;
use sqlx::{FromRow, MySql, Pool, Sqlite};

use crate::db::connection::DatabaseConnection;
use crate::error::{Error, Result};
use crate::schema::types::{Column, TableSchema};
use crate::utils::naming::validate_identifier;

/// Schema analyzer trait
#[async_trait]
pub trait Analyzer {
    /// Columns of a table in ordinal order; empty when the table is absent
    async fn analyze_columns(&self, table_name: &str) -> std::result::Result<Vec<Column>, sqlx::Error>;

    /// Names of the base tables in the current database
    async fn analyze_tables(&self) -> std::result::Result<Vec<String>, sqlx::Error>;
}

/// Schema analyzer for runtime table introspection
#[derive(Debug, Clone)]
pub struct SchemaAnalyzer {
    connection: DatabaseConnection,
}

impl SchemaAnalyzer {
    /// Create a new schema analyzer
    pub fn new(connection: DatabaseConnection) -> Self {
        Self { connection }
    }

    /// Discover the columns of a table
    pub async fn table_schema(&self, table_name: &str) -> Result<TableSchema> {
        validate_identifier(table_name)?;

        let columns = match &self.connection {
            DatabaseConnection::MySql(pool) => MySqlAnalyzer { pool }.analyze_columns(table_name).await,
            DatabaseConnection::Sqlite(pool) => SqliteAnalyzer { pool }.analyze_columns(table_name).await,
        }
        .map_err(|e| Error::from_query(table_name, e))?;

        if columns.is_empty() {
            return Err(Error::MissingTable(table_name.to_string()));
        }

        for column in &columns {
            validate_identifier(&column.name)?;
        }

        tracing::debug!(table = table_name, columns = columns.len(), "Discovered table schema");
        Ok(TableSchema {
            name: table_name.to_string(),
            columns,
        })
    }

    /// List the tables present in the database
    pub async fn table_names(&self) -> Result<Vec<String>> {
        let names = match &self.connection {
            DatabaseConnection::MySql(pool) => MySqlAnalyzer { pool }.analyze_tables().await,
            DatabaseConnection::Sqlite(pool) => SqliteAnalyzer { pool }.analyze_tables().await,
        }?;
        Ok(names)
    }
}

#[derive(FromRow)]
struct ColumnRow {
    name: String,
    data_type: String,
    is_nullable: String,
    column_key: String,
}

/// MySQL schema analyzer
struct MySqlAnalyzer<'a> {
    pool: &'a Pool<MySql>,
}

#[async_trait]
impl<'a> Analyzer for MySqlAnalyzer<'a> {
    async fn analyze_columns(&self, table_name: &str) -> std::result::Result<Vec<Column>, sqlx::Error> {
        // information_schema labels differ in case across server versions,
        // and some report binary strings, hence the aliases and casts.
        let sql = r#"
            SELECT
                CAST(column_name AS CHAR) AS name,
                CAST(column_type AS CHAR) AS data_type,
                CAST(is_nullable AS CHAR) AS is_nullable,
                CAST(column_key AS CHAR) AS column_key
            FROM information_schema.columns
            WHERE table_schema = DATABASE() AND table_name = ?
            ORDER BY ordinal_position
        "#;

        let rows = sqlx::query_as::<_, ColumnRow>(sql)
            .bind(table_name)
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Column {
                name: row.name,
                data_type: row.data_type,
                nullable: row.is_nullable == "YES",
                is_primary_key: row.column_key == "PRI",
            })
            .collect())
    }

    async fn analyze_tables(&self) -> std::result::Result<Vec<String>, sqlx::Error> {
        let sql = r#"
            SELECT CAST(table_name AS CHAR)
            FROM information_schema.tables
            WHERE table_schema = DATABASE() AND table_type = 'BASE TABLE'
            ORDER BY table_name
        "#;

        sqlx::query_scalar::<_, String>(sql).fetch_all(self.pool).await
    }
}

/// SQLite schema analyzer
struct SqliteAnalyzer<'a> {
    pool: &'a Pool<Sqlite>,
}

#[async_trait]
impl<'a> Analyzer for SqliteAnalyzer<'a> {
    async fn analyze_columns(&self, table_name: &str) -> std::result::Result<Vec<Column>, sqlx::Error> {
        let sql = r#"
            SELECT
                name,
                type AS data_type,
                CASE WHEN "notnull" = 0 THEN 'YES' ELSE 'NO' END AS is_nullable,
                CASE WHEN pk > 0 THEN 'PRI' ELSE '' END AS column_key
            FROM pragma_table_info(?)
            ORDER BY cid
        "#;

        let rows = sqlx::query_as::<_, ColumnRow>(sql)
            .bind(table_name)
            .fetch_all(self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| Column {
                name: row.name,
                data_type: row.data_type,
                nullable: row.is_nullable == "YES",
                is_primary_key: row.column_key == "PRI",
            })
            .collect())
    }

    async fn analyze_tables(&self) -> std::result::Result<Vec<String>, sqlx::Error> {
        let sql = r#"
            SELECT name FROM sqlite_master
            WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
            ORDER BY name
        "#;

        sqlx::query_scalar::<_, String>(sql).fetch_all(self.pool).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn analyzer() -> SchemaAnalyzer {
        let conn = DatabaseConnection::in_memory().await.unwrap();
        conn.execute(
            "CREATE TABLE Specialty (Speciality_ID INTEGER PRIMARY KEY, Name TEXT NOT NULL, Code TEXT)",
            &[],
        )
        .await
        .unwrap();
        SchemaAnalyzer::new(conn)
    }

    #[tokio::test]
    async fn discovers_columns_in_order() {
        let schema = analyzer().await.table_schema("Specialty").await.unwrap();

        assert_eq!(schema.column_names(), vec!["Speciality_ID", "Name", "Code"]);
        assert!(schema.columns[0].is_primary_key);
        assert!(!schema.columns[1].nullable);
        assert!(schema.columns[2].nullable);
        assert_eq!(schema.columns[1].data_type, "TEXT");
    }

    #[tokio::test]
    async fn absent_table_is_missing() {
        let err = analyzer().await.table_schema("Donations").await.unwrap_err();
        assert!(matches!(err, Error::MissingTable(name) if name == "Donations"));
    }

    #[tokio::test]
    async fn unsafe_table_name_never_reaches_database() {
        let err = analyzer().await.table_schema("x; DROP TABLE Specialty").await.unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier(_)));
    }

    #[tokio::test]
    async fn accepts_column_names_starting_with_digit() {
        let analyzer = analyzer().await;
        analyzer
            .connection
            .execute("CREATE TABLE Jobs (Job_ID INTEGER PRIMARY KEY, `1st_Job` TEXT)", &[])
            .await
            .unwrap();

        let schema = analyzer.table_schema("Jobs").await.unwrap();
        assert_eq!(schema.editable_names(), vec!["1st_Job"]);
    }

    #[tokio::test]
    async fn lists_tables() {
        let names = analyzer().await.table_names().await.unwrap();
        assert_eq!(names, vec!["Specialty".to_string()]);
    }
}
