//! Record store
//!
//! Thin layer between the browser and editor and the shared connection.
//! Each method issues exactly one data statement; driver errors are
//! classified against the table they were raised for.

use crate::db::connection::{DatabaseConnection, TextRows};
use crate::error::{Error, Result};
use crate::records::query::{QueryBuilder, Statement};
use crate::records::types::{Record, RowSet};
use crate::schema::analyzer::SchemaAnalyzer;
use crate::schema::types::TableSchema;

/// Reads and writes rows of any catalog table
#[derive(Debug, Clone)]
pub struct RecordStore {
    connection: DatabaseConnection,
    analyzer: SchemaAnalyzer,
}

impl RecordStore {
    pub fn new(connection: DatabaseConnection) -> Self {
        let analyzer = SchemaAnalyzer::new(connection.clone());
        Self {
            connection,
            analyzer,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Discover the current columns of a table
    pub async fn schema(&self, table: &str) -> Result<TableSchema> {
        self.analyzer.table_schema(table).await
    }

    fn builder(&self, table: &str) -> Result<QueryBuilder> {
        QueryBuilder::new(self.connection.dialect(), table)
    }

    async fn fetch(&self, table: &str, stmt: &Statement) -> Result<TextRows> {
        self.connection
            .fetch_text_rows(&stmt.sql, &stmt.binds)
            .await
            .map_err(|e| Error::from_query(table, e))
    }

    async fn scalar(&self, table: &str, stmt: &Statement) -> Result<i64> {
        self.connection
            .fetch_i64(&stmt.sql, &stmt.binds)
            .await
            .map_err(|e| Error::from_query(table, e))
    }

    async fn execute(&self, table: &str, stmt: &Statement) -> Result<u64> {
        self.connection
            .execute(&stmt.sql, &stmt.binds)
            .await
            .map_err(|e| Error::from_query(table, e))
    }

    /// Every row of a table
    pub async fn list(&self, table: &str) -> Result<RowSet> {
        let schema = self.schema(table).await?;
        let columns = schema.column_names();
        let stmt = self.builder(table)?.select_all(&columns)?;
        let rows = self.fetch(table, &stmt).await?;

        tracing::debug!(table, rows = rows.len(), "Listed table");
        Ok(RowSet::new(columns, rows))
    }

    /// Rows with any column containing `term`, ignoring case
    pub async fn search(&self, table: &str, term: &str) -> Result<RowSet> {
        let schema = self.schema(table).await?;
        let columns = schema.column_names();
        let stmt = self.builder(table)?.search(&columns, term)?;
        let rows = self.fetch(table, &stmt).await?;

        tracing::debug!(table, term, rows = rows.len(), "Searched table");
        Ok(RowSet::new(columns, rows))
    }

    /// The key a new row should receive: largest key plus one
    pub async fn next_key(&self, schema: &TableSchema) -> Result<i64> {
        let key = key_name(schema)?;
        let stmt = self.builder(&schema.name)?.max_key(key)?;
        self.scalar(&schema.name, &stmt)
            .await?
            .checked_add(1)
            .ok_or_else(|| {
                Error::DatabaseError(format!("No key left above the largest {} in {}", key, schema.name))
            })
    }

    /// Load a single row by key
    pub async fn fetch_record(&self, schema: &TableSchema, key: &str) -> Result<Record> {
        let columns = schema.column_names();
        let stmt = self.builder(&schema.name)?.select_by_key(&columns, key)?;
        let row = self
            .fetch(&schema.name, &stmt)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::RecordNotFound {
                table: schema.name.clone(),
                key: key.to_string(),
            })?;

        Ok(Record::new(&schema.name, &columns, row))
    }

    /// Count rows whose editable values equal `values`, optionally
    /// ignoring the row with `exclude_key`
    pub async fn count_duplicates(
        &self,
        schema: &TableSchema,
        values: &[String],
        exclude_key: Option<&str>,
    ) -> Result<i64> {
        let stmt = self.builder(&schema.name)?.count_duplicates(
            key_name(schema)?,
            &schema.editable_names(),
            values,
            exclude_key,
        )?;

        match stmt {
            Some(stmt) => self.scalar(&schema.name, &stmt).await,
            None => Ok(0),
        }
    }

    /// Insert a row; `values` covers every column, key first
    pub async fn insert(&self, schema: &TableSchema, values: &[String]) -> Result<u64> {
        let stmt = self.builder(&schema.name)?.insert(&schema.column_names(), values)?;
        let affected = self.execute(&schema.name, &stmt).await?;

        tracing::info!(table = %schema.name, key = ?values.first(), "Inserted record");
        Ok(affected)
    }

    /// Update the editable columns of the row with `key`
    pub async fn update(&self, schema: &TableSchema, key: &str, values: &[String]) -> Result<u64> {
        let stmt = self.builder(&schema.name)?.update(
            key_name(schema)?,
            &schema.editable_names(),
            values,
            key,
        )?;
        let affected = self.execute(&schema.name, &stmt).await?;

        tracing::info!(table = %schema.name, key, affected, "Updated record");
        Ok(affected)
    }

    /// Delete the row whose `key_column` equals `key`
    pub async fn delete(&self, table: &str, key_column: &str, key: &str) -> Result<u64> {
        let stmt = self.builder(table)?.delete(key_column, key)?;
        let affected = self.execute(table, &stmt).await?;

        tracing::info!(table, key_column, key, affected, "Deleted record");
        Ok(affected)
    }
}

fn key_name(schema: &TableSchema) -> Result<&str> {
    schema
        .key_column()
        .map(|c| c.name.as_str())
        .ok_or_else(|| Error::MissingTable(schema.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn store() -> RecordStore {
        let conn = DatabaseConnection::in_memory().await.unwrap();
        conn.execute(
            "CREATE TABLE Specialty (Speciality_ID INTEGER PRIMARY KEY, Name TEXT, Code TEXT)",
            &[],
        )
        .await
        .unwrap();
        RecordStore::new(conn)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn next_key_starts_at_one() {
        let store = store().await;
        let schema = store.schema("Specialty").await.unwrap();
        assert_eq!(store.next_key(&schema).await.unwrap(), 1);

        store.insert(&schema, &strings(&["41", "Physics", "01"])).await.unwrap();
        assert_eq!(store.next_key(&schema).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn next_key_reports_exhausted_keys() {
        let store = store().await;
        let schema = store.schema("Specialty").await.unwrap();
        store
            .insert(&schema, &strings(&["9223372036854775807", "Physics", "01"]))
            .await
            .unwrap();

        let err = store.next_key(&schema).await.unwrap_err();
        assert!(matches!(err, Error::DatabaseError(msg) if msg.contains("Speciality_ID")));
    }

    #[tokio::test]
    async fn insert_list_update_delete() {
        let store = store().await;
        let schema = store.schema("Specialty").await.unwrap();

        store.insert(&schema, &strings(&["1", "Physics", "01"])).await.unwrap();
        store.insert(&schema, &strings(&["2", "Chemistry", "02"])).await.unwrap();

        let rows = store.list("Specialty").await.unwrap();
        assert_eq!(rows.columns, strings(&["Speciality_ID", "Name", "Code"]));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.cell(1, 1), "Chemistry");

        let affected = store.update(&schema, "2", &strings(&["Biology", "03"])).await.unwrap();
        assert_eq!(affected, 1);
        let record = store.fetch_record(&schema, "2").await.unwrap();
        assert_eq!(record.text("Name"), "Biology");

        assert_eq!(store.delete("Specialty", "Speciality_ID", "1").await.unwrap(), 1);
        assert_eq!(store.list("Specialty").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicates_exclude_edited_row() {
        let store = store().await;
        let schema = store.schema("Specialty").await.unwrap();
        store.insert(&schema, &strings(&["1", "Physics", "01"])).await.unwrap();

        let same = strings(&["Physics", "01"]);
        assert_eq!(store.count_duplicates(&schema, &same, None).await.unwrap(), 1);
        assert_eq!(store.count_duplicates(&schema, &same, Some("1")).await.unwrap(), 0);
        assert_eq!(
            store.count_duplicates(&schema, &strings(&["Physics", "02"]), None).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn missing_record_is_reported() {
        let store = store().await;
        let schema = store.schema("Specialty").await.unwrap();
        let err = store.fetch_record(&schema, "99").await.unwrap_err();
        assert!(matches!(err, Error::RecordNotFound { key, .. } if key == "99"));
    }

    #[tokio::test]
    async fn dropped_table_is_missing() {
        let store = store().await;
        let schema = store.schema("Specialty").await.unwrap();
        store.connection().execute("DROP TABLE Specialty", &[]).await.unwrap();

        let err = store.next_key(&schema).await.unwrap_err();
        assert!(matches!(err, Error::MissingTable(name) if name == "Specialty"));
    }
}
