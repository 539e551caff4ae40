//! Head-pose scroll controller.
//!
//! Turns a stream of pose observations into scroll commands. Head roll acts
//! as a gate with hysteresis: tilting right past the roll threshold enables
//! scrolling, tilting left past the negated threshold disables it, and
//! anything in between keeps the current state. While enabled, pitch beyond
//! the deadzone scrolls by the current sensitivity in the matching direction.

use crate::{
    constants::{DEFAULT_PITCH_DEADZONE, DEFAULT_ROLL_ENABLE_THRESHOLD, DEFAULT_SENSITIVITY, INITIAL_SCROLLING_ENABLED},
    error::{Error, Result},
    notify::EnablementListener,
    pose::{PoseObservation, ScrollCommand},
};
use log::debug;
use std::sync::{
    atomic::{AtomicI32, Ordering},
    Arc,
};

/// Angular thresholds driving the controller, in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Roll magnitude that flips the scroll gate
    pub roll_enable_threshold: f64,
    /// Pitch magnitude below which no scrolling happens
    pub pitch_deadzone: f64,
}

impl Thresholds {
    /// Create validated thresholds
    ///
    /// # Errors
    ///
    /// Returns an error if either threshold is negative or not finite
    pub fn new(roll_enable_threshold: f64, pitch_deadzone: f64) -> Result<Self> {
        let thresholds = Self {
            roll_enable_threshold,
            pitch_deadzone,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Check both thresholds are finite and non-negative
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` naming the offending threshold
    pub fn validate(&self) -> Result<()> {
        check_threshold("roll enable threshold", self.roll_enable_threshold)?;
        check_threshold("pitch deadzone", self.pitch_deadzone)
    }
}

fn check_threshold(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{name} must be a finite, non-negative angle, got {value}"
        )))
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            roll_enable_threshold: DEFAULT_ROLL_ENABLE_THRESHOLD,
            pitch_deadzone: DEFAULT_PITCH_DEADZONE,
        }
    }
}

/// Shared handle to the scroll sensitivity.
///
/// Cloning yields another handle to the same value, so a UI thread can
/// adjust sensitivity while the frame loop is processing.
#[derive(Debug, Clone, Default)]
pub struct Sensitivity(Arc<AtomicI32>);

impl Sensitivity {
    /// Create a handle holding `value`
    #[must_use]
    pub fn new(value: i32) -> Self {
        Self(Arc::new(AtomicI32::new(value)))
    }

    /// Current value
    #[must_use]
    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Relaxed)
    }

    /// Replace the value
    pub fn set(&self, value: i32) {
        self.0.store(value, Ordering::Relaxed);
    }
}

/// Per-frame decision procedure mapping head pose to scroll commands
pub struct ScrollController {
    thresholds: Thresholds,
    scrolling_enabled: bool,
    sensitivity: Sensitivity,
    listeners: Vec<Box<dyn EnablementListener>>,
}

impl ScrollController {
    /// Create a controller with scrolling enabled
    #[must_use]
    pub fn new(thresholds: Thresholds, sensitivity: i32) -> Self {
        Self::with_sensitivity(thresholds, Sensitivity::new(sensitivity))
    }

    /// Create a controller reading sensitivity from an existing handle
    #[must_use]
    pub fn with_sensitivity(thresholds: Thresholds, sensitivity: Sensitivity) -> Self {
        Self {
            thresholds,
            scrolling_enabled: INITIAL_SCROLLING_ENABLED,
            sensitivity,
            listeners: Vec::new(),
        }
    }

    /// Register a listener for gate transitions
    pub fn subscribe(&mut self, listener: Box<dyn EnablementListener>) {
        self.listeners.push(listener);
    }

    /// Whether pitch currently produces scroll commands
    #[must_use]
    pub const fn is_scrolling_enabled(&self) -> bool {
        self.scrolling_enabled
    }

    /// Current sensitivity
    #[must_use]
    pub fn sensitivity(&self) -> i32 {
        self.sensitivity.get()
    }

    /// Change sensitivity; takes effect on the next observation
    pub fn set_sensitivity(&self, value: i32) {
        self.sensitivity.set(value);
    }

    /// Handle for adjusting sensitivity from another thread
    #[must_use]
    pub fn sensitivity_handle(&self) -> Sensitivity {
        self.sensitivity.clone()
    }

    /// Thresholds in use
    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Process one observation.
    ///
    /// Updates the roll gate first, then maps pitch to a scroll command if
    /// the gate is open.
    pub fn process(&mut self, observation: PoseObservation) -> Option<ScrollCommand> {
        self.update_gate(observation.roll);

        if !self.scrolling_enabled {
            return None;
        }

        let deadzone = self.thresholds.pitch_deadzone;
        let sensitivity = self.sensitivity.get();
        if observation.pitch > deadzone {
            debug!("Head down (pitch {:.3}), scrolling {}", observation.pitch, sensitivity);
            Some(ScrollCommand::uniform(sensitivity))
        } else if observation.pitch < -deadzone {
            let delta = sensitivity.wrapping_neg();
            debug!("Head up (pitch {:.3}), scrolling {}", observation.pitch, delta);
            Some(ScrollCommand::uniform(delta))
        } else {
            None
        }
    }

    fn update_gate(&mut self, roll: f64) {
        let threshold = self.thresholds.roll_enable_threshold;
        let next = if roll > threshold {
            true
        } else if roll < -threshold {
            false
        } else {
            return;
        };

        if next != self.scrolling_enabled {
            self.scrolling_enabled = next;
            debug!("Scroll gate {} at roll {:.3}", if next { "opened" } else { "closed" }, roll);
            for listener in &mut self.listeners {
                listener.on_enablement_changed(next);
            }
        }
    }
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(Thresholds::default(), DEFAULT_SENSITIVITY)
    }
}

impl std::fmt::Debug for ScrollController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollController")
            .field("thresholds", &self.thresholds)
            .field("scrolling_enabled", &self.scrolling_enabled)
            .field("sensitivity", &self.sensitivity.get())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    struct Counter(mpsc::Sender<bool>);

    impl EnablementListener for Counter {
        fn on_enablement_changed(&mut self, enabled: bool) {
            self.0.send(enabled).unwrap();
        }
    }

    #[test]
    fn test_starts_enabled() {
        let controller = ScrollController::default();
        assert!(controller.is_scrolling_enabled());
        assert_eq!(controller.sensitivity(), DEFAULT_SENSITIVITY);
    }

    #[test]
    fn test_example_scenario() {
        let (tx, rx) = mpsc::channel();
        let mut controller = ScrollController::new(Thresholds::default(), 5);
        controller.subscribe(Box::new(Counter(tx)));

        assert_eq!(
            controller.process(PoseObservation::new(0.2, 0.5)),
            Some(ScrollCommand { dx: 5, dy: 5 })
        );
        assert!(rx.try_recv().is_err());

        assert_eq!(controller.process(PoseObservation::new(0.0, -0.5)), None);
        assert!(!controller.is_scrolling_enabled());
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![false]);

        assert_eq!(controller.process(PoseObservation::new(0.2, 0.0)), None);
    }

    #[test]
    fn test_head_up_scrolls_negative() {
        let mut controller = ScrollController::new(Thresholds::default(), 3);
        assert_eq!(
            controller.process(PoseObservation::new(-0.3, 0.0)),
            Some(ScrollCommand { dx: -3, dy: -3 })
        );
    }

    #[test]
    fn test_threshold_boundaries_are_exclusive() {
        let thresholds = Thresholds::new(0.2, 0.1).unwrap();
        let mut controller = ScrollController::new(thresholds, 2);

        assert_eq!(controller.process(PoseObservation::new(0.1, 0.0)), None);
        assert_eq!(controller.process(PoseObservation::new(-0.1, 0.0)), None);

        controller.process(PoseObservation::new(0.0, -0.2));
        assert!(controller.is_scrolling_enabled());
        controller.process(PoseObservation::new(0.0, -0.21));
        assert!(!controller.is_scrolling_enabled());
        controller.process(PoseObservation::new(0.0, 0.2));
        assert!(!controller.is_scrolling_enabled());
    }

    #[test]
    fn test_sensitivity_change_applies_next_frame() {
        let mut controller = ScrollController::new(Thresholds::default(), 1);
        let handle = controller.sensitivity_handle();

        assert_eq!(controller.process(PoseObservation::new(0.5, 0.0)), Some(ScrollCommand::uniform(1)));
        handle.set(8);
        assert_eq!(controller.process(PoseObservation::new(0.5, 0.0)), Some(ScrollCommand::uniform(8)));
        controller.set_sensitivity(2);
        assert_eq!(handle.get(), 2);
    }

    #[test]
    fn test_sensitivity_written_from_other_thread() {
        let mut controller = ScrollController::new(Thresholds::default(), 1);
        let handle = controller.sensitivity_handle();

        thread::spawn(move || handle.set(42)).join().unwrap();

        assert_eq!(controller.process(PoseObservation::new(0.5, 0.0)), Some(ScrollCommand::uniform(42)));
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        assert!(Thresholds::new(-0.1, 0.1).is_err());
        assert!(Thresholds::new(0.2, f64::NAN).is_err());
        assert!(Thresholds::new(f64::INFINITY, 0.1).is_err());
        assert!(Thresholds::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_debug_output_mentions_state() {
        let controller = ScrollController::default();
        let text = format!("{controller:?}");
        assert!(text.contains("scrolling_enabled: true"));
    }
}
