//! Result type alias for the packager

use super::errors::PackagerError;

/// Result type alias for packager operations
///
/// This is a convenience type alias that uses `PackagerError` as the error type.
///
/// # Examples
///
/// ```
/// use packager::domain::result::Result;
/// use packager::domain::errors::PackagerError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(PackagerError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, PackagerError>;
