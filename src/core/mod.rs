//! Core business logic for the packager.
//!
//! # Modules
//!
//! - [`manifest`] - Borderel manifest generation and staging
//! - [`archive`] - Zip archive construction and `share://` storage mapping
//! - [`pipeline`] - Run guard, claiming, per-report state machine, reconciliation
//!
//! # Packaging Workflow
//!
//! 1. **Reconcile**: Clear statuses left in processing by a crashed process
//! 2. **Guard**: Refuse to start while any report is processing
//! 3. **Fetch**: Read sent reports without status, oldest first
//! 4. **Claim**: Move each report to processing, in order
//! 5. **Package**: Check the file count, stage the manifest, write the zip
//! 6. **Record**: Register the package and mark the report packaged, or mark it failed
//!
//! # Example
//!
//! ```rust,no_run
//! use packager::adapters::memory::InMemoryStore;
//! use packager::config::PackagingConfig;
//! use packager::core::pipeline::{ReportPipeline, TriggerOutcome};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! let pipeline = ReportPipeline::from_config(store, &PackagingConfig::default());
//!
//! pipeline.reconcile().await?;
//! if let TriggerOutcome::Accepted(run) = pipeline.trigger().await? {
//!     let summary = run.wait().await?;
//!     println!("Packaged: {}", summary.packaged);
//!     println!("Failed: {}", summary.failed);
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod manifest;
pub mod pipeline;
