//! Attribute value bounds.

use crate::error::CoreError;

/// Default lower bound for a new attribute value.
pub const DEFAULT_MIN_VALUE: f64 = -999_999.0;

/// Default upper bound for a new attribute value.
pub const DEFAULT_MAX_VALUE: f64 = 999_999.0;

/// Validate that `min <= max` and both are finite.
pub fn validate_bounds(min: f64, max: f64) -> Result<(), CoreError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(CoreError::Validation(
            "Value bounds must be finite numbers".to_string(),
        ));
    }
    if min > max {
        return Err(CoreError::Validation(format!(
            "Minimum value {min} exceeds maximum value {max}"
        )));
    }
    Ok(())
}

/// Whether `base` lies inside `[min, max]`.
///
/// Out-of-range base values are stored as entered; this only flags them.
pub fn is_within_bounds(base: f64, min: f64, max: f64) -> bool {
    (min..=max).contains(&base)
}
