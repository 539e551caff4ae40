//! Pose observations and the scroll commands derived from them.

use crate::utils::degrees_to_radians;
use serde::{Deserialize, Serialize};

/// Head orientation for a single processed frame, in radians.
///
/// Positive pitch means the head is tilted down; positive roll means the
/// head is tilted to the right. The sign convention is whatever the pose
/// provider uses, as long as it is consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseObservation {
    /// Forward/back tilt
    pub pitch: f64,
    /// Sideways tilt
    pub roll: f64,
}

impl PoseObservation {
    /// Create an observation from angles in radians
    #[must_use]
    pub const fn new(pitch: f64, roll: f64) -> Self {
        Self { pitch, roll }
    }

    /// Create an observation from angles in degrees
    #[must_use]
    pub fn from_degrees(pitch: f64, roll: f64) -> Self {
        Self {
            pitch: degrees_to_radians(pitch),
            roll: degrees_to_radians(roll),
        }
    }

    /// Both angles are finite numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.pitch.is_finite() && self.roll.is_finite()
    }
}

/// Unit of the angles written by the pose provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    /// Radians (native unit of the controller)
    #[default]
    Radians,
    /// Degrees, converted on input
    Degrees,
}

impl AngleUnit {
    /// Build an observation from raw provider angles in this unit
    #[must_use]
    pub fn observation(self, pitch: f64, roll: f64) -> PoseObservation {
        match self {
            Self::Radians => PoseObservation::new(pitch, roll),
            Self::Degrees => PoseObservation::from_degrees(pitch, roll),
        }
    }
}

/// Scroll delta in lines, always paired so that `dx == dy`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrollCommand {
    /// Horizontal wheel delta
    pub dx: i32,
    /// Vertical wheel delta
    pub dy: i32,
}

impl ScrollCommand {
    /// Both wheels driven by the same signed amount
    #[must_use]
    pub const fn uniform(delta: i32) -> Self {
        Self { dx: delta, dy: delta }
    }
}
