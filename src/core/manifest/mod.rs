//! Manifest ("borderel") generation
//!
//! Every package carries a `borderel.xml` describing where it is routed and
//! which files it contains.
//!
//! # Example
//!
//! ```rust
//! use packager::core::manifest::ManifestBuilder;
//! use packager::domain::{ReportBuilder, ReportFile};
//! use chrono::Utc;
//!
//! let report = ReportBuilder::new()
//!     .uri("http://data.lblod.info/bbcdr-reports/1").unwrap()
//!     .id("5c2f1a7e").unwrap()
//!     .modified(Utc::now())
//!     .build()
//!     .unwrap();
//! let files = vec![ReportFile::new("share://a.xlsx", "a.xlsx", "application/vnd.ms-excel", 10)];
//!
//! let manifest = ManifestBuilder::default().build(&report, &files);
//! let xml = manifest.to_xml().unwrap();
//! assert!(xml.contains("a.xlsx"));
//! ```

pub mod builder;
pub mod document;
pub mod staging;

pub use builder::ManifestBuilder;
pub use document::{Manifest, ManifestEntry, RoutingMetadata};
pub use staging::StagedManifest;
