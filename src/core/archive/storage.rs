//! Mapping between `share://` locations and the local file tree

use crate::domain::ArchiveError;
use std::path::{Component, Path, PathBuf};

/// Scheme of logical file locations
pub const SHARE_SCHEME: &str = "share://";

/// Resolves `share://` locations against a local root directory
///
/// `share://a/b.pdf` maps to `<root>/a/b.pdf` and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The local root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a `share://` location to a local path
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidLocation`] for other schemes, empty paths
    /// and paths containing `..`.
    pub fn resolve(&self, location: &str) -> Result<PathBuf, ArchiveError> {
        let invalid = |reason: &str| ArchiveError::InvalidLocation {
            location: location.to_string(),
            reason: reason.to_string(),
        };

        let relative = location
            .strip_prefix(SHARE_SCHEME)
            .ok_or_else(|| invalid("expected a share:// location"))?
            .trim_start_matches('/');

        let mut path = self.root.clone();
        let mut segments = 0;
        for segment in relative.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(invalid("parent directory references are not allowed")),
                _ => {
                    path.push(segment);
                    segments += 1;
                }
            }
        }

        if segments == 0 {
            return Err(invalid("location has no path"));
        }
        Ok(path)
    }

    /// Map a local path inside the root back to its `share://` location
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidLocation`] if the path is outside the root.
    pub fn to_location(&self, path: &Path) -> Result<String, ArchiveError> {
        let relative = path
            .strip_prefix(&self.root)
            .map_err(|_| ArchiveError::InvalidLocation {
                location: path.display().to_string(),
                reason: format!("not inside {}", self.root.display()),
            })?;

        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Ok(format!("{SHARE_SCHEME}{}", segments.join("/")))
    }
}
