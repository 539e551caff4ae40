//! Scroll event emission.
//!
//! A [`ScrollCommand`] is first encoded as a platform-neutral [`WheelEvent`]
//! (line units, two wheels, synthetic-event marker) and then handed to a
//! [`ScrollSink`]. The X11 backend replays wheel clicks through the XTEST
//! extension; the log backend only records what would have been posted.

use crate::{
    constants::{
        LARGE_CLICK_COUNT, SYNTHETIC_EVENT_MARKER, WHEEL_COUNT, X11_BUTTON_SCROLL_DOWN, X11_BUTTON_SCROLL_LEFT,
        X11_BUTTON_SCROLL_RIGHT, X11_BUTTON_SCROLL_UP,
    },
    error::{AppError, Result},
    pose::ScrollCommand,
    utils::safe_cast::click_count,
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use x11rb::{
    connection::{Connection, RequestConnection},
    protocol::{
        xproto::{Window, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT},
        xtest::{self, ConnectionExt as _},
    },
    rust_connection::RustConnection,
    CURRENT_TIME,
};

/// Unit of the wheel deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollUnit {
    /// Lines of text
    Line,
}

/// Scroll wheel event ready to be posted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WheelEvent {
    /// Unit of `wheel1` and `wheel2`
    pub unit: ScrollUnit,
    /// Number of wheels carried by the event
    pub wheel_count: u32,
    /// Vertical wheel, positive scrolls up
    pub wheel1: i32,
    /// Horizontal wheel, positive scrolls left
    pub wheel2: i32,
    /// Marks the event as synthetic for downstream filters
    pub user_data: i64,
}

impl WheelEvent {
    /// Same event with both wheels reversed
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self {
            wheel1: self.wheel1.wrapping_neg(),
            wheel2: self.wheel2.wrapping_neg(),
            ..self
        }
    }

    /// Total wheel clicks across both wheels
    #[must_use]
    pub fn total_clicks(&self) -> u64 {
        u64::from(click_count(self.wheel1)) + u64::from(click_count(self.wheel2))
    }

    /// X11 button presses reproducing this event, as `(button, clicks)`
    #[must_use]
    pub fn button_clicks(&self) -> Vec<(u8, u32)> {
        let mut clicks = Vec::with_capacity(2);
        if self.wheel1 != 0 {
            let button = if self.wheel1 > 0 { X11_BUTTON_SCROLL_UP } else { X11_BUTTON_SCROLL_DOWN };
            clicks.push((button, click_count(self.wheel1)));
        }
        if self.wheel2 != 0 {
            let button = if self.wheel2 > 0 { X11_BUTTON_SCROLL_LEFT } else { X11_BUTTON_SCROLL_RIGHT };
            clicks.push((button, click_count(self.wheel2)));
        }
        clicks
    }
}

impl From<ScrollCommand> for WheelEvent {
    fn from(command: ScrollCommand) -> Self {
        Self {
            unit: ScrollUnit::Line,
            wheel_count: WHEEL_COUNT,
            wheel1: command.dy,
            wheel2: command.dx,
            user_data: SYNTHETIC_EVENT_MARKER,
        }
    }
}

/// Destination for wheel events
pub trait ScrollSink: Send {
    /// Post one wheel event
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the event
    fn post(&mut self, event: &WheelEvent) -> Result<()>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Selectable scroll backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputBackend {
    /// Inject wheel clicks through X11 XTEST
    #[default]
    X11,
    /// Log events without posting them
    Log,
}

/// Posts wheel events through the X11 XTEST extension
///
/// Each line of scroll is one button press and one release request, so a
/// frame costs `2 * total_clicks()` requests. Large sensitivities slow the
/// frame loop accordingly.
pub struct X11ScrollSink {
    connection: RustConnection,
    root: Window,
}

impl X11ScrollSink {
    /// Connect to the X server and check for XTEST
    pub fn new() -> Result<Self> {
        info!("Initializing X11 scroll output");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| AppError::X11(format!("Failed to connect to X11: {e}")))?;

        let root = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| AppError::X11("Failed to get screen".to_string()))?
            .root;

        connection
            .extension_information(xtest::X11_EXTENSION_NAME)
            .map_err(|e| AppError::X11(format!("Failed to query XTEST extension: {e}")))?
            .ok_or_else(|| AppError::X11("XTEST extension not available".to_string()))?;

        let version = connection
            .xtest_get_version(2, 2)
            .map_err(|e| AppError::X11(format!("Failed to send XTEST version request: {e}")))?
            .reply()
            .map_err(|e| AppError::X11(format!("Failed to get XTEST version: {e}")))?;

        info!(
            "Connected to X11 display with XTEST {}.{}",
            version.major_version, version.minor_version
        );

        Ok(Self { connection, root })
    }

    fn click(&self, button: u8) -> Result<()> {
        for event_type in [BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT] {
            self.connection
                .xtest_fake_input(event_type, button, CURRENT_TIME, self.root, 0, 0, 0)
                .map_err(|e| AppError::ScrollOutput(format!("Failed to fake button {button}: {e}")))?;
        }
        Ok(())
    }
}

impl ScrollSink for X11ScrollSink {
    fn post(&mut self, event: &WheelEvent) -> Result<()> {
        debug!("Posting wheel event {:?}", event);

        let clicks = event.total_clicks();
        if clicks > LARGE_CLICK_COUNT {
            warn!("Posting {} wheel clicks in one frame; lower the sensitivity if scrolling lags", clicks);
        }

        for (button, clicks) in event.button_clicks() {
            for _ in 0..clicks {
                self.click(button)?;
            }
        }

        self.connection
            .flush()
            .map_err(|e| AppError::ScrollOutput(format!("Failed to flush connection: {e}")))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "x11"
    }
}

/// Logs wheel events instead of posting them
#[derive(Debug, Default)]
pub struct LogScrollSink {
    posted: u64,
}

impl LogScrollSink {
    /// Create a log-only sink
    #[must_use]
    pub const fn new() -> Self {
        Self { posted: 0 }
    }

    /// Number of events logged so far
    #[must_use]
    pub const fn posted(&self) -> u64 {
        self.posted
    }
}

impl ScrollSink for LogScrollSink {
    fn post(&mut self, event: &WheelEvent) -> Result<()> {
        self.posted += 1;
        info!(
            "Scroll {} lines vertical, {} lines horizontal",
            event.wheel1, event.wheel2
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Create a sink for the requested backend
///
/// # Errors
///
/// Returns an error if the X11 backend cannot connect
pub fn create_sink(backend: OutputBackend) -> Result<Box<dyn ScrollSink>> {
    match backend {
        OutputBackend::X11 => Ok(Box::new(X11ScrollSink::new()?)),
        OutputBackend::Log => Ok(Box::new(LogScrollSink::new())),
    }
}
