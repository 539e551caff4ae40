//! Constants used throughout the application

/// Default roll beyond which the scroll gate flips (radians)
pub const DEFAULT_ROLL_ENABLE_THRESHOLD: f64 = 0.2;

/// Default pitch deadzone around a level head (radians)
pub const DEFAULT_PITCH_DEADZONE: f64 = 0.1;

/// Default scroll sensitivity in lines per frame
pub const DEFAULT_SENSITIVITY: i32 = 1;

/// Scrolling is enabled until the user tilts their head to disable it
pub const INITIAL_SCROLLING_ENABLED: bool = true;

/// Marker stored in the user-data field of synthetic wheel events
pub const SYNTHETIC_EVENT_MARKER: i64 = 1;

/// Number of wheels encoded in each wheel event (vertical + horizontal)
pub const WHEEL_COUNT: u32 = 2;

/// Default number of pose observations buffered between reader and frame loop
pub const DEFAULT_QUEUE_CAPACITY: usize = 4;

/// Wheel clicks per frame above which posting is reported as slow
pub const LARGE_CLICK_COUNT: u64 = 1000;

/// X11 core pointer buttons used for wheel emulation
pub const X11_BUTTON_SCROLL_UP: u8 = 4;
pub const X11_BUTTON_SCROLL_DOWN: u8 = 5;
pub const X11_BUTTON_SCROLL_LEFT: u8 = 6;
pub const X11_BUTTON_SCROLL_RIGHT: u8 = 7;

/// Toast messages shown on gate transitions
pub const SCROLL_ENABLED_MESSAGE: &str = "Tilt head right: scrolling enabled";
pub const SCROLL_DISABLED_MESSAGE: &str = "Tilt head left: scrolling disabled";
