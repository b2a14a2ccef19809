//! Postgres wire-protocol store (CockroachDB or managed Postgres)
//!
//! Construction is eager: the pool hands out a first connection and the
//! record table is ensured before `connect` returns.

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use platform_core::{Backend, PlatformError, Record, Result, Store};
use std::fmt;
use tokio_postgres::NoTls;
use tracing::{debug, info, instrument};

pub const DEFAULT_TABLE: &str = "micro_store";

/// Pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub url: String,
    pub max_size: usize,
    pub table: String,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://root@127.0.0.1:26257/micro?sslmode=disable".to_string(),
            max_size: 16,
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl PoolConfig {
    /// Accepts a full connection URL or a bare `host:port`
    pub fn from_address(address: &str) -> Self {
        Self {
            url: postgres_url(address),
            ..Self::default()
        }
    }
}

/// Adapt a bare `host:port` into a connection URL; URLs and key=value
/// connection strings pass through untouched
pub fn postgres_url(address: &str) -> String {
    if address.contains("://") || address.contains('=') {
        address.to_string()
    } else {
        format!("postgresql://root@{}/micro?sslmode=disable", address)
    }
}

#[derive(Clone)]
pub struct PostgresStore {
    pool: Pool,
    table: String,
}

impl PostgresStore {
    #[instrument(skip(config), fields(table = %config.table))]
    pub async fn connect(config: PoolConfig) -> Result<Self> {
        if !is_identifier(&config.table) {
            return Err(PlatformError::Config(format!(
                "invalid table name: {}",
                config.table
            )));
        }

        info!(max_size = config.max_size, "Creating store connection pool");

        let pg_config: tokio_postgres::Config = config
            .url
            .parse()
            .map_err(|e| PlatformError::Config(format!("Invalid store address: {}", e)))?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let manager = Manager::from_config(pg_config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.max_size)
            .build()
            .map_err(|e| PlatformError::Connection(e.to_string()))?;

        let client = pool
            .get()
            .await
            .map_err(|e| PlatformError::Connection(e.to_string()))?;

        client
            .batch_execute(&format!(
                "CREATE TABLE IF NOT EXISTS {} (key TEXT PRIMARY KEY, value BYTEA NOT NULL)",
                config.table
            ))
            .await
            .map_err(|e| PlatformError::Database(e.to_string()))?;

        debug!("Store connection verified");

        Ok(Self {
            pool,
            table: config.table,
        })
    }

    async fn client(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| PlatformError::Connection(e.to_string()))
    }
}

impl fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStore")
            .field("table", &self.table)
            .field("pool_size", &self.pool.status().size)
            .finish()
    }
}

impl Backend for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn read(&self, key: &str) -> Result<Option<Record>> {
        let row = self
            .client()
            .await?
            .query_opt(
                &format!("SELECT key, value FROM {} WHERE key = $1", self.table),
                &[&key],
            )
            .await
            .map_err(|e| PlatformError::Database(e.to_string()))?;

        Ok(row.map(|row| Record::new(row.get::<_, String>(0), row.get::<_, Vec<u8>>(1))))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<Record>> {
        let pattern = format!("{}%", escape_like(prefix));
        let rows = self
            .client()
            .await?
            .query(
                &format!(
                    "SELECT key, value FROM {} WHERE key LIKE $1 ORDER BY key",
                    self.table
                ),
                &[&pattern],
            )
            .await
            .map_err(|e| PlatformError::Database(e.to_string()))?;

        Ok(rows
            .iter()
            .map(|row| Record::new(row.get::<_, String>(0), row.get::<_, Vec<u8>>(1)))
            .collect())
    }

    async fn write(&self, record: Record) -> Result<()> {
        self.client()
            .await?
            .execute(
                &format!(
                    "INSERT INTO {} (key, value) VALUES ($1, $2) \
                     ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
                    self.table
                ),
                &[&record.key, &record.value],
            )
            .await
            .map_err(|e| PlatformError::Database(e.to_string()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client()
            .await?
            .execute(
                &format!("DELETE FROM {} WHERE key = $1", self.table),
                &[&key],
            )
            .await
            .map_err(|e| PlatformError::Database(e.to_string()))?;
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit())
}

fn escape_like(prefix: &str) -> String {
    let mut escaped = String::with_capacity(prefix.len());
    for c in prefix.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_default() {
        let config = PoolConfig::default();
        assert_eq!(config.max_size, 16);
        assert_eq!(config.table, DEFAULT_TABLE);
    }

    #[test]
    fn test_bare_address_adapted() {
        assert_eq!(
            postgres_url("10.0.0.5:5432"),
            "postgresql://root@10.0.0.5:5432/micro?sslmode=disable"
        );
        let url = "postgresql://doadmin:pw@pg.internal:25060/defaultdb?sslmode=require";
        assert_eq!(postgres_url(url), url);
        assert_eq!(PoolConfig::from_address("10.0.0.5:5432").url, postgres_url("10.0.0.5:5432"));
    }

    #[test]
    fn test_adapted_url_parses() {
        let parsed: std::result::Result<tokio_postgres::Config, _> =
            postgres_url("10.0.0.5:5432").parse();
        assert!(parsed.is_ok());
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("a_b%c"), "a\\_b\\%c");
    }

    #[tokio::test]
    async fn test_invalid_table_rejected_before_connecting() {
        let config = PoolConfig {
            table: "store; DROP TABLE x".to_string(),
            ..PoolConfig::default()
        };
        assert!(matches!(
            PostgresStore::connect(config).await,
            Err(PlatformError::Config(_))
        ));
    }
}
