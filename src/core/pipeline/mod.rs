//! Report packaging pipeline
//!
//! - [`coordinator`] - triggers, run guard, dispatch and reconciliation
//! - [`packager`] - store-free packaging of one report
//! - [`outcome`] - packaging outcomes and failure reasons
//! - [`summary`] - run handles and summaries
//!
//! # Report lifecycle
//!
//! ```text
//! (no status) --claim--> PROCESSING
//! PROCESSING --files ok, archive ok, registered--> PACKAGED
//! PROCESSING --count mismatch or any error--> PACKAGING_FAILED
//! PROCESSING (left by a crash) --reconcile--> (no status)
//! ```

pub mod coordinator;
pub mod outcome;
pub mod packager;
pub mod summary;

pub use coordinator::{apply_outcome, ReportPipeline};
pub use outcome::{FailureReason, PackagingOutcome};
pub use packager::{check_file_count, ReportPackager};
pub use summary::{ReportOutcome, RunHandle, RunSummary, TriggerOutcome};
