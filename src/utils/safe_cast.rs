//! Safe casting utilities for values arriving from the pose provider

use crate::{Error, Result};

/// Safely convert f64 to i32 with bounds checking
///
/// The fractional part is truncated toward zero.
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is safe
pub fn f64_to_i32(value: f64) -> Result<i32> {
    let truncated = value.trunc();
    if truncated.is_finite() && truncated >= f64::from(i32::MIN) && truncated <= f64::from(i32::MAX) {
        Ok(truncated as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i32"
        )))
    }
}

/// Number of wheel clicks for a signed line delta
#[must_use]
pub const fn click_count(lines: i32) -> u32 {
    lines.unsigned_abs()
}
