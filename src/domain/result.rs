//! Result type alias for the service
//!
//! This module provides a convenient Result type alias that uses `AmbulanceError`
//! as the error type.

use super::errors::AmbulanceError;

/// Result type alias for service operations
///
/// # Examples
///
/// ```
/// use ambulance_wl::domain::result::Result;
/// use ambulance_wl::domain::errors::AmbulanceError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(AmbulanceError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AmbulanceError>;
