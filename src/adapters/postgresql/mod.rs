//! PostgreSQL metadata store
//!
//! This module provides the PostgreSQL implementation of the metadata store.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLStore;
pub use client::PostgreSQLClient;
pub use models::{FileRow, PackageRow, ReportRow};
