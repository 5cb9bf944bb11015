//! GradRecords: a terminal front-end for a graduate records database
//!
//! GradRecords lists, searches, adds, edits and deletes rows of a small set
//! of related tables. Table columns are discovered from the database at
//! runtime, so the same browser and editor serve every table.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod records;
pub mod schema;
pub mod ui;
pub mod utils;

// Re-export main types for easier access
pub use catalog::TableCatalog;
pub use config::Config;
pub use db::connection::DatabaseConnection;
pub use error::{Error, Result};
pub use records::{RecordEditor, RecordStore, TableBrowser};
pub use schema::analyzer::SchemaAnalyzer;

use std::path::Path;

/// Initialize GradRecords with the specified configuration file
pub async fn init(config_path: impl AsRef<Path>) -> Result<GradRecordsClient> {
    let config = config::load_from_file(config_path)?;
    GradRecordsClient::new(config).await
}

/// Owns the configuration and the shared connection
pub struct GradRecordsClient {
    config: Config,
    catalog: TableCatalog,
    store: RecordStore,
}

impl GradRecordsClient {
    /// Connect using the given configuration
    pub async fn new(config: Config) -> Result<Self> {
        let connection = DatabaseConnection::connect(&config.database).await?;
        Ok(Self::with_connection(config, connection))
    }

    /// Use an already open connection
    pub fn with_connection(config: Config, connection: DatabaseConnection) -> Self {
        let catalog = TableCatalog::new(config.tables.clone());
        let store = RecordStore::new(connection);
        Self {
            config,
            catalog,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &TableCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Catalog tables that the database does not have
    pub async fn missing_tables(&self) -> Result<Vec<String>> {
        let present = SchemaAnalyzer::new(self.store.connection().clone())
            .table_names()
            .await?;

        Ok(self
            .catalog
            .names()
            .into_iter()
            .filter(|name| !present.iter().any(|p| p.eq_ignore_ascii_case(name)))
            .map(str::to_string)
            .collect())
    }

    /// Build the terminal application over the shared connection
    pub fn app(&self) -> ui::App {
        ui::App::new(self.store.clone(), self.catalog.clone())
    }

    /// Close the shared connection
    pub async fn close(self) {
        self.store.connection().close().await;
    }
}
