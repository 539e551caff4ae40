//! Head-pose driven mouse scrolling.
//!
//! This library turns head pose estimates into scroll wheel events:
//! - Tilting the head down or up scrolls by a configurable number of lines
//! - Rolling the head right enables scrolling, rolling it left disables it
//! - Roll uses hysteresis, so small wobbles around level never toggle the gate
//!
//! Pose estimation itself is done by an external provider that writes one
//! observation per frame; see [`input`] for the line format.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```
//! use head_scroll::{
//!     controller::{ScrollController, Thresholds},
//!     pose::{PoseObservation, ScrollCommand},
//! };
//!
//! let mut controller = ScrollController::new(Thresholds::default(), 5);
//!
//! // Head tilted down while scrolling is enabled
//! let command = controller.process(PoseObservation::new(0.2, 0.0));
//! assert_eq!(command, Some(ScrollCommand { dx: 5, dy: 5 }));
//!
//! // Roll the head left to disable scrolling
//! controller.process(PoseObservation::new(0.0, -0.5));
//! assert!(!controller.is_scrolling_enabled());
//! assert_eq!(controller.process(PoseObservation::new(0.2, 0.0)), None);
//! ```
//!
//! ## Watching the Scroll Gate
//!
//! ```
//! use head_scroll::{
//!     controller::{ScrollController, Thresholds},
//!     notify::ChannelNotifier,
//!     pose::PoseObservation,
//! };
//! use std::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel();
//! let mut controller = ScrollController::new(Thresholds::default(), 1);
//! controller.subscribe(Box::new(ChannelNotifier::new(tx)));
//!
//! controller.process(PoseObservation::new(0.0, -0.5));
//! assert_eq!(rx.try_recv(), Ok(false));
//! ```
//!
//! ## Complete Pipeline Example
//!
//! ```no_run
//! use head_scroll::{app::ScrollApp, config::Config};
//! use std::io::BufReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = ScrollApp::new(Config::default())?;
//! let summary = app.run(BufReader::new(std::io::stdin()))?;
//! println!("{} scroll commands", summary.commands_emitted);
//! # Ok(())
//! # }
//! ```

/// Head-pose scroll controller
pub mod controller;

/// Pose observations and scroll commands
pub mod pose;

/// Listeners for scroll gate transitions
pub mod notify;

/// Pose provider input parsing
pub mod input;

/// Scroll event emission (X11 XTEST)
pub mod scroll_output;

/// Utility functions for numeric conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Main application module
pub mod app;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
