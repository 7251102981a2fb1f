//! Archive (zip) construction
//!
//! - [`storage`] - `share://` location mapping
//! - [`builder`] - zip writing with a staged manifest

pub mod builder;
pub mod storage;

pub use builder::{
    archive_target, ArchiveBuilder, ArchiveRef, DEFAULT_COMPRESSION_LEVEL, MANIFEST_ENTRY_NAME,
};
pub use storage::{FileStorage, SHARE_SCHEME};
