//! PostgreSQL client implementation
//!
//! This module provides the pooled client used by the PostgreSQL metadata store.

use crate::adapters::store::StoreResult;
use crate::config::schema::PostgreSQLConfig;
use crate::config::secret::redacted_connection_string;
use crate::domain::{PackagerError, Result, StoreError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use postgres_native_tls::MakeTlsConnector;
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::config::SslMode;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for the packager
///
/// Wraps a connection pool; every query runs with the configured statement
/// timeout.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until the first query.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string is invalid, the TLS connector
    /// cannot be built or the pool cannot be created.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let connection_string: &str = config.connection_string.expose_secret().as_ref();
        let mut pg_config: tokio_postgres::Config = connection_string.parse().map_err(|e| {
            PackagerError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
        })?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = if config.requires_tls() {
            pg_config.ssl_mode(SslMode::Require);
            let connector = build_tls_connector(&config.ssl_mode)?;
            Manager::from_config(pg_config, connector, manager_config)
        } else {
            Manager::from_config(pg_config, NoTls, manager_config)
        };

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| {
                StoreError::Unavailable(format!("Failed to create connection pool: {e}"))
            })?;

        tracing::debug!(
            target_db = %redacted_connection_string(&config.connection_string),
            "PostgreSQL pool created"
        );

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    ///
    /// Attempts to get a connection from the pool and execute a simple query.
    pub async fn test_connection(&self) -> StoreResult<()> {
        let client = self.get_connection().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| StoreError::Unavailable(format!("Connection test failed: {e}")))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Ensure the packager schema exists
    ///
    /// Runs the bundled migration; every statement is idempotent.
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        let client = self.get_connection().await?;

        let migration_sql = include_str!("../../../migrations/001_initial_schema.sql");

        client
            .batch_execute(migration_sql)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Failed to execute migration: {e}")))?;

        tracing::info!("PostgreSQL schema initialized successfully");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] if a connection cannot be obtained.
    pub async fn get_connection(&self) -> StoreResult<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Unavailable(format!("Failed to get connection from pool: {e}")))
    }

    async fn get_connection_with_timeout(&self) -> StoreResult<deadpool_postgres::Object> {
        let client = self.get_connection().await?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client.execute(&timeout_query, &[]).await.map_err(|e| {
            StoreError::Unavailable(format!("Failed to set statement timeout: {e}"))
        })?;

        Ok(client)
    }

    /// Execute a query and return rows
    ///
    /// # Arguments
    ///
    /// * `query` - SQL query
    /// * `params` - Query parameters
    pub async fn query(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> StoreResult<Vec<Row>> {
        let client = self.get_connection_with_timeout().await?;

        client
            .query(query, params)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Query failed: {e}")))
    }

    /// Execute a query expected to return exactly one row
    pub async fn query_one(
        &self,
        query: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> StoreResult<Row> {
        let client = self.get_connection_with_timeout().await?;

        client
            .query_one(query, params)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Query failed: {e}")))
    }

    /// Execute a statement and return the number of affected rows
    ///
    /// # Arguments
    ///
    /// * `statement` - SQL statement
    /// * `params` - Statement parameters
    pub async fn execute(
        &self,
        statement: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> StoreResult<u64> {
        let client = self.get_connection_with_timeout().await?;

        client
            .execute(statement, params)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("Statement execution failed: {e}")))
    }

    /// Get the connection string (without password)
    pub fn connection_string_safe(&self) -> String {
        redacted_connection_string(&self.config.connection_string)
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}

/// Builds the TLS connector for `require`, `verify-ca` and `verify-full`
///
/// `require` encrypts without verifying the server certificate, `verify-ca`
/// skips the hostname check only.
fn build_tls_connector(ssl_mode: &str) -> Result<MakeTlsConnector> {
    let mut builder = native_tls::TlsConnector::builder();
    match ssl_mode {
        "require" => {
            builder.danger_accept_invalid_certs(true);
            builder.danger_accept_invalid_hostnames(true);
        }
        "verify-ca" => {
            builder.danger_accept_invalid_hostnames(true);
        }
        _ => {}
    }

    let connector = builder.build().map_err(|e| {
        PackagerError::Configuration(format!("Failed to build TLS connector: {e}"))
    })?;
    Ok(MakeTlsConnector::new(connector))
}
