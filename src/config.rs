//! Configuration management for the head scroll application

use crate::{
    constants::{DEFAULT_PITCH_DEADZONE, DEFAULT_QUEUE_CAPACITY, DEFAULT_ROLL_ENABLE_THRESHOLD, DEFAULT_SENSITIVITY},
    controller::Thresholds,
    input::Overflow,
    pose::AngleUnit,
    scroll_output::OutputBackend,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scroll controller configuration
    pub controller: ControllerConfig,

    /// Pose input configuration
    pub input: InputConfig,

    /// Scroll output configuration
    pub output: OutputConfig,

    /// Capture configuration forwarded to the pose provider
    pub capture: CaptureConfig,
}

/// Scroll controller parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Roll beyond which scrolling is enabled or disabled (radians)
    pub roll_enable_threshold: f64,

    /// Pitch deadzone around a level head (radians)
    pub pitch_deadzone: f64,

    /// Lines scrolled per frame while the head is tilted
    pub sensitivity: i32,
}

/// Pose input parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Unit of the angles written by the pose provider
    pub angle_unit: AngleUnit,

    /// Poses buffered between the reader and the frame loop
    pub queue_capacity: usize,

    /// Behaviour when the buffer is full
    pub overflow: Overflow,
}

/// Scroll output parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Backend used to post wheel events
    pub backend: OutputBackend,

    /// Reverse scroll direction
    pub invert: bool,
}

/// Capture parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera the pose provider should open
    pub camera_index: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            roll_enable_threshold: DEFAULT_ROLL_ENABLE_THRESHOLD,
            pitch_deadzone: DEFAULT_PITCH_DEADZONE,
            sensitivity: DEFAULT_SENSITIVITY,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Radians,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            overflow: Overflow::Drop,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            backend: OutputBackend::X11,
            invert: false,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { camera_index: 0 }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_yaml()?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Serialize configuration to YAML text
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Controller thresholds from this configuration
    pub fn thresholds(&self) -> Result<Thresholds> {
        Thresholds::new(self.controller.roll_enable_threshold, self.controller.pitch_deadzone)
            .map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.thresholds()?;

        if self.input.queue_capacity == 0 {
            return Err(Error::ConfigError(
                "Input queue capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Scroll Configuration

# Scroll controller
controller:
  # Tilt your head right past this roll (radians) to enable scrolling,
  # left past its negation to disable it
  roll_enable_threshold: 0.2
  # No scrolling while |pitch| stays within this deadzone (radians)
  pitch_deadzone: 0.1
  # Lines scrolled per frame
  sensitivity: 1

# Pose provider input
input:
  angle_unit: radians
  queue_capacity: 4
  overflow: drop

# Scroll output
output:
  backend: x11
  invert: false

# Forwarded to the pose provider
capture:
  camera_index: 0
"#;
