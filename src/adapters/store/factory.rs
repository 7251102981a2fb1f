//! Metadata store factory
//!
//! This module provides the factory function that creates the metadata store
//! from configuration.

use crate::adapters::postgresql::adapter::PostgreSQLStore;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::store::traits::MetadataStore;
use crate::config::schema::PackagerConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Create the metadata store described by the configuration
///
/// # Arguments
///
/// * `config` - The packager configuration
///
/// # Returns
///
/// Returns an Arc-wrapped trait object that implements MetadataStore
///
/// # Errors
///
/// Returns an error if the connection pool cannot be created
pub async fn create_metadata_store(
    config: &PackagerConfig,
) -> Result<Arc<dyn MetadataStore + Send + Sync>> {
    tracing::info!(
        ssl_mode = %config.postgresql.ssl_mode,
        max_connections = config.postgresql.max_connections,
        "Creating PostgreSQL metadata store"
    );
    let client = PostgreSQLClient::new(config.postgresql.clone()).await?;
    let store = PostgreSQLStore::new(client);

    Ok(Arc::new(store) as Arc<dyn MetadataStore + Send + Sync>)
}
