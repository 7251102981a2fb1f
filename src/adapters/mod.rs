//! External system integrations for the packager.
//!
//! - [`store`] - Metadata store abstraction (trait-based) and factory
//! - [`postgresql`] - PostgreSQL implementation
//! - [`memory`] - In-memory implementation for tests and local runs
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing without a database. The pipeline only sees
//! `Arc<dyn MetadataStore + Send + Sync>`.
//!
//! ```rust
//! use packager::adapters::memory::InMemoryStore;
//! use packager::adapters::store::MetadataStore;
//! use std::sync::Arc;
//!
//! let store: Arc<dyn MetadataStore + Send + Sync> = Arc::new(InMemoryStore::new());
//! # let _ = store;
//! ```

pub mod memory;
pub mod postgresql;
pub mod store;
