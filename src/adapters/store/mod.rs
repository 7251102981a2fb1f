//! Metadata store abstraction layer
//!
//! This module provides a trait-based abstraction over the store holding
//! reports, their files, packaging statuses and packages.

pub mod factory;
pub mod traits;

pub use factory::create_metadata_store;
pub use traits::{MetadataStore, StatusCounts, StoreOperation, StoreResult};
