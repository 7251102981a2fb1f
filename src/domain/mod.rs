//! Domain models and types for the packager.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ReportUri`], [`ReportId`], [`PackageId`])
//! - **Domain models** ([`Report`], [`ReportFile`], [`Package`])
//! - **The packaging status state machine** ([`ReportStatus`])
//! - **Error types** ([`PackagerError`], [`StoreError`], [`ManifestError`], [`ArchiveError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! A report has two identities: the store URI and the short id used in file
//! names. Both are newtypes so they cannot be swapped by accident:
//!
//! ```rust
//! use packager::domain::{ReportId, ReportUri};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let uri = ReportUri::new("http://data.lblod.info/bbcdr-reports/1")?;
//! let id = ReportId::new("5c2f1a7e")?;
//!
//! // This won't compile - the types are distinct
//! // let wrong: ReportId = uri;
//! # let _ = (uri, id);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PackagerError>`]:
//!
//! ```rust,no_run
//! use packager::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = packager::config::load_config("packager.toml")?;
//!     # let _ = config;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod ids;
pub mod package;
pub mod report;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ArchiveError, ManifestError, PackagerError, StoreError};
pub use ids::{PackageId, ReportId, ReportUri};
pub use package::Package;
pub use report::{Report, ReportBuilder, ReportFile, ReportStatus, SENT_DOCUMENT_STATUS};
pub use result::Result;
