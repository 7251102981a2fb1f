//! CLI command implementations
//!
//! This module contains all CLI command implementations. Commands return the
//! process exit code:
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | success |
//! | 1 | run completed with failed reports |
//! | 2 | configuration error |
//! | 3 | packaging already running |
//! | 4 | store connection error |
//! | 5 | fatal error |

pub mod init;
pub mod reconcile;
pub mod run;
pub mod serve;
pub mod status;
pub mod validate;

use crate::adapters::store::{create_metadata_store, MetadataStore};
use crate::config::{load_config, redacted_connection_string, PackagerConfig};
use std::sync::Arc;

/// Load the configuration, printing the failure and returning exit code 2
pub(crate) fn load_or_report(config_path: &str) -> Result<PackagerConfig, i32> {
    load_config(config_path).map_err(|e| {
        tracing::error!(error = %e, config_path = %config_path, "Failed to load configuration");
        println!("❌ Failed to load configuration file");
        println!("   Error: {e}");
        2 // Configuration error exit code
    })
}

/// Create the metadata store and verify it is reachable, printing the failure
/// and returning exit code 4
pub(crate) async fn connect_or_report(
    config: &PackagerConfig,
) -> Result<Arc<dyn MetadataStore + Send + Sync>, i32> {
    let target = redacted_connection_string(&config.postgresql.connection_string);

    let store = match create_metadata_store(config).await {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(error = %e, target_db = %target, "Failed to create metadata store");
            println!("❌ Failed to connect to database {target}");
            println!("   Error: {e}");
            return Err(4); // Connection error exit code
        }
    };

    if let Err(e) = store.test_connection().await {
        tracing::error!(error = %e, target_db = %target, "Metadata store unreachable");
        println!("❌ Failed to connect to database {target}");
        println!("   Error: {e}");
        return Err(4); // Connection error exit code
    }

    Ok(store)
}
