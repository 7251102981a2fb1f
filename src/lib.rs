//! # Packager - report packaging service
//!
//! Packager collects administrative reports that have been sent, bundles the
//! files of each report together with a generated borderel manifest into a
//! zip archive, and registers the archive as the report's package.
//!
//! ## Overview
//!
//! A packaging run:
//! - **Discovers** sent reports without a packaging status, oldest first
//! - **Claims** each report by moving it to `processing`
//! - **Packages** complete reports into a zip archive with a manifest
//! - **Records** `packaged` or `packaging_failed` for every claimed report
//!
//! Only one run may touch reports at a time: a trigger is refused while any
//! report is still `processing`. Reports left `processing` by an interrupted
//! process are released by reconciliation at startup.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Manifest generation, archive building and the packaging pipeline
//! - [`adapters`] - Metadata store implementations (PostgreSQL, in-memory)
//! - [`server`] - HTTP trigger endpoint and interval scheduler
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use packager::adapters::store::create_metadata_store;
//! use packager::config::load_config;
//! use packager::core::pipeline::{ReportPipeline, TriggerOutcome};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("packager.toml")?;
//! let store = create_metadata_store(&config).await?;
//! let pipeline = ReportPipeline::from_config(store, &config.packaging);
//!
//! pipeline.reconcile().await?;
//! if let TriggerOutcome::Accepted(run) = pipeline.trigger().await? {
//!     let summary = run.wait().await?;
//!     println!("Packaged {} report(s)", summary.packaged);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], built on [`domain::PackagerError`].
//! Failures of a single report never surface as errors: they are recorded as
//! the report's `packaging_failed` status and in the run summary.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod server;
