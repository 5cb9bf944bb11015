//! Database connection handling
//!
//! The program shares one connection for its whole lifetime. It is held in
//! a sqlx pool capped at a single connection so statements run strictly in
//! order.

use std::str::FromStr;
use std::time::Duration;

use sqlx::{
    mysql::{MySqlConnectOptions, MySqlPoolOptions},
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    MySql, Pool, Row, Sqlite,
};

use crate::config::DatabaseConfig;
use crate::db::dialect::Dialect;
use crate::error::{Error, Result};

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Rows decoded as optional strings, one `Vec` per row
pub type TextRows = Vec<Vec<Option<String>>>;

/// The shared database connection
#[derive(Debug, Clone)]
pub enum DatabaseConnection {
    MySql(Pool<MySql>),
    Sqlite(Pool<Sqlite>),
}

impl DatabaseConnection {
    /// Open the shared connection described by the configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS));

        match config.driver.as_str() {
            "mysql" => {
                let options = mysql_options(config)?;
                let pool = MySqlPoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(timeout)
                    .connect_with(options)
                    .await?;

                tracing::info!(driver = "mysql", "Connected to database");
                Ok(DatabaseConnection::MySql(pool))
            }
            "sqlite" => {
                let options = sqlite_options(config)?;
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .acquire_timeout(timeout)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await?;

                tracing::info!(driver = "sqlite", "Connected to database");
                Ok(DatabaseConnection::Sqlite(pool))
            }
            _ => Err(Error::DatabaseError(format!(
                "Unsupported database driver: {}",
                config.driver
            ))),
        }
    }

    /// Open a private in-memory SQLite database
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(DatabaseConnection::Sqlite(pool))
    }

    /// SQL dialect spoken by this connection
    pub fn dialect(&self) -> Dialect {
        match self {
            DatabaseConnection::MySql(_) => Dialect::MySql,
            DatabaseConnection::Sqlite(_) => Dialect::Sqlite,
        }
    }

    /// Run a query whose columns are all text and collect every row
    pub async fn fetch_text_rows(
        &self,
        sql: &str,
        binds: &[String],
    ) -> std::result::Result<TextRows, sqlx::Error> {
        tracing::trace!(sql, binds = binds.len(), "fetch rows");
        match self {
            DatabaseConnection::MySql(pool) => {
                let mut query = sqlx::query(sql);
                for value in binds {
                    query = query.bind(value.as_str());
                }
                let rows = query.fetch_all(pool).await?;
                rows.iter()
                    .map(|row| {
                        (0..row.len())
                            .map(|i| row.try_get::<Option<String>, _>(i))
                            .collect::<std::result::Result<Vec<_>, _>>()
                    })
                    .collect()
            }
            DatabaseConnection::Sqlite(pool) => {
                let mut query = sqlx::query(sql);
                for value in binds {
                    query = query.bind(value.as_str());
                }
                let rows = query.fetch_all(pool).await?;
                rows.iter()
                    .map(|row| {
                        (0..row.len())
                            .map(|i| row.try_get::<Option<String>, _>(i))
                            .collect::<std::result::Result<Vec<_>, _>>()
                    })
                    .collect()
            }
        }
    }

    /// Run a query returning a single integer
    pub async fn fetch_i64(&self, sql: &str, binds: &[String]) -> std::result::Result<i64, sqlx::Error> {
        tracing::trace!(sql, binds = binds.len(), "fetch scalar");
        match self {
            DatabaseConnection::MySql(pool) => {
                let mut query = sqlx::query_scalar::<_, i64>(sql);
                for value in binds {
                    query = query.bind(value.as_str());
                }
                query.fetch_one(pool).await
            }
            DatabaseConnection::Sqlite(pool) => {
                let mut query = sqlx::query_scalar::<_, i64>(sql);
                for value in binds {
                    query = query.bind(value.as_str());
                }
                query.fetch_one(pool).await
            }
        }
    }

    /// Execute a single statement, returning the number of affected rows.
    ///
    /// Outside an explicit transaction each statement commits on its own.
    pub async fn execute(&self, sql: &str, binds: &[String]) -> std::result::Result<u64, sqlx::Error> {
        tracing::trace!(sql, binds = binds.len(), "execute");
        match self {
            DatabaseConnection::MySql(pool) => {
                let mut query = sqlx::query(sql);
                for value in binds {
                    query = query.bind(value.as_str());
                }
                Ok(query.execute(pool).await?.rows_affected())
            }
            DatabaseConnection::Sqlite(pool) => {
                let mut query = sqlx::query(sql);
                for value in binds {
                    query = query.bind(value.as_str());
                }
                Ok(query.execute(pool).await?.rows_affected())
            }
        }
    }

    /// Close the connection
    pub async fn close(&self) {
        match self {
            DatabaseConnection::MySql(pool) => pool.close().await,
            DatabaseConnection::Sqlite(pool) => pool.close().await,
        }
    }
}

/// Build MySQL connect options from either the URL or the credential fields
pub fn mysql_options(config: &DatabaseConfig) -> Result<MySqlConnectOptions> {
    if let Some(url) = &config.url {
        return Ok(MySqlConnectOptions::from_str(url)?);
    }

    let field = |value: &Option<String>, key: &str| {
        value
            .clone()
            .ok_or_else(|| Error::ConfigError(format!("Missing database setting: {}", key)))
    };

    let mut options = MySqlConnectOptions::new()
        .host(&field(&config.host, "host")?)
        .username(&field(&config.user, "user")?)
        .database(&field(&config.database, "database")?);

    if let Some(password) = &config.password {
        options = options.password(password);
    }
    if let Some(port) = config.port {
        options = options.port(port);
    }

    Ok(options)
}

/// Build SQLite connect options from either the URL or the database path
pub fn sqlite_options(config: &DatabaseConfig) -> Result<SqliteConnectOptions> {
    match (&config.url, &config.database) {
        (Some(url), _) => Ok(SqliteConnectOptions::from_str(url)?),
        (None, Some(path)) => Ok(SqliteConnectOptions::new().filename(path)),
        (None, None) => Err(Error::ConfigError(
            "sqlite driver needs either `url` or `database`".to_string(),
        )),
    }
}
