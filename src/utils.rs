//! Utility functions for numeric conversions and angle units.

pub mod safe_cast;

/// Convert an angle from degrees to radians
#[must_use]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}
