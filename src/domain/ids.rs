//! Domain identifier types with validation
//!
//! Newtype wrappers for report and package identifiers. Each type keeps the
//! different identities of a report (store URI vs. short id) from being mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Report URI newtype wrapper
///
/// The opaque identity of a report inside the metadata store, typically an IRI
/// such as `http://data.lblod.info/bbcdr-reports/<uuid>`.
///
/// # Examples
///
/// ```
/// use packager::domain::ids::ReportUri;
/// use std::str::FromStr;
///
/// let uri = ReportUri::from_str("http://data.lblod.info/bbcdr-reports/42").unwrap();
/// assert_eq!(uri.as_str(), "http://data.lblod.info/bbcdr-reports/42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportUri(String);

impl ReportUri {
    /// Creates a new ReportUri from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(ReportUri)` if the URI is non-empty and contains no whitespace,
    /// `Err` otherwise
    pub fn new(uri: impl Into<String>) -> Result<Self, String> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            return Err("Report URI cannot be empty".to_string());
        }
        if uri.chars().any(char::is_whitespace) {
            return Err(format!("Report URI cannot contain whitespace: '{uri}'"));
        }
        Ok(Self(uri))
    }

    /// Returns the report URI as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ReportUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportUri {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ReportUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Report id newtype wrapper
///
/// The short identifier of a report (`mu:uuid` upstream). It ends up in file
/// names (staged manifest, archive), so it is restricted to characters that are
/// safe in a single path segment.
///
/// # Examples
///
/// ```
/// use packager::domain::ids::ReportId;
///
/// assert!(ReportId::new("5c2f1a7e-0d1b-4c3e-9b1a-7f7e1b2c3d4e").is_ok());
/// assert!(ReportId::new("../etc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportId(String);

impl ReportId {
    /// Creates a new ReportId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Report ID cannot be empty".to_string());
        }
        if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(format!(
                "Invalid report ID '{id}'. Only ASCII letters, digits, '-' and '_' are allowed"
            ));
        }
        Ok(Self(id))
    }

    /// Returns the report ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReportId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ReportId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Package identifier
///
/// Generated once per successful packaging attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(Uuid);

impl PackageId {
    /// Generates a new random package id
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for PackageId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PackageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid package ID '{s}': {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_uri_valid() {
        let uri = ReportUri::new("http://data.lblod.info/bbcdr-reports/1").unwrap();
        assert_eq!(uri.to_string(), "http://data.lblod.info/bbcdr-reports/1");
    }

    #[test]
    fn test_report_uri_rejects_empty_and_whitespace() {
        assert!(ReportUri::new("").is_err());
        assert!(ReportUri::new("   ").is_err());
        assert!(ReportUri::new("http://x/ y").is_err());
    }

    #[test]
    fn test_report_id_valid() {
        let id = ReportId::new("5c2f1a7e-0d1b_4c3e").unwrap();
        assert_eq!(id.as_str(), "5c2f1a7e-0d1b_4c3e");
    }

    #[test]
    fn test_report_id_rejects_path_characters() {
        assert!(ReportId::new("").is_err());
        assert!(ReportId::new("a/b").is_err());
        assert!(ReportId::new("..").is_err());
        assert!(ReportId::new("a b").is_err());
    }

    #[test]
    fn test_package_id_roundtrip_through_display() {
        let id = PackageId::generate();
        let parsed = PackageId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_package_id_invalid() {
        assert!(PackageId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_generated_package_ids_are_unique() {
        assert_ne!(PackageId::generate(), PackageId::generate());
    }
}
