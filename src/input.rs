//! Line-oriented pose input from an external pose provider.
//!
//! Each line is one of:
//! - a JSON pose, `{"pitch": 0.2, "roll": -0.05}`
//! - a JSON sensitivity update, `{"sensitivity": 5}`
//! - a plain `pitch roll` pair separated by whitespace or a comma
//!
//! Blank lines, `#` comments and undecodable lines are skipped. A reader
//! thread parses the stream and forwards events to the frame loop over a
//! bounded channel, in input order. Live input drops poses when the channel
//! is full; replayed input waits instead.

use crate::{
    error::{Error, Result},
    pose::{AngleUnit, PoseObservation},
    utils::safe_cast::f64_to_i32,
};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    io::BufRead,
    sync::mpsc::{sync_channel, Receiver, TrySendError},
    thread::{self, JoinHandle},
};

/// One decoded input line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pose for one frame, already converted to radians
    Pose(PoseObservation),
    /// New sensitivity chosen by the user
    Sensitivity(i32),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonLine {
    Pose { pitch: f64, roll: f64 },
    Sensitivity { sensitivity: f64 },
}

/// Parse a single input line
///
/// Returns `Ok(None)` for blank lines and comments.
///
/// # Errors
///
/// Returns `Error::PoseInput` for malformed lines or non-finite angles
pub fn parse_line(line: &str, unit: AngleUnit) -> Result<Option<InputEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let event = if line.starts_with('{') {
        let parsed: JsonLine = serde_json::from_str(line)
            .map_err(|e| Error::PoseInput(format!("Invalid JSON line '{line}': {e}")))?;
        match parsed {
            JsonLine::Pose { pitch, roll } => InputEvent::Pose(unit.observation(pitch, roll)),
            JsonLine::Sensitivity { sensitivity } => InputEvent::Sensitivity(
                f64_to_i32(sensitivity).map_err(|e| Error::PoseInput(e.to_string()))?,
            ),
        }
    } else {
        let fields: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        let [pitch, roll] = fields.as_slice() else {
            return Err(Error::PoseInput(format!(
                "Expected 'pitch roll', got {} fields in '{line}'",
                fields.len()
            )));
        };
        let pitch = parse_angle(pitch)?;
        let roll = parse_angle(roll)?;
        InputEvent::Pose(unit.observation(pitch, roll))
    };

    if let InputEvent::Pose(observation) = event {
        if !observation.is_finite() {
            return Err(Error::PoseInput(format!("Non-finite angle in '{line}'")));
        }
    }

    Ok(Some(event))
}

fn parse_angle(field: &str) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|e| Error::PoseInput(format!("Invalid angle '{field}': {e}")))
}

/// What the reader does when the frame loop has not taken the previous pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Drop the new pose (live camera input)
    #[default]
    Drop,
    /// Wait for room in the queue (recorded input replay)
    Block,
}

/// Counters collected by the reader thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Lines read from the provider
    pub lines: u64,
    /// Poses handed to the frame loop
    pub poses_forwarded: u64,
    /// Poses dropped because the frame loop was behind
    pub frames_dropped: u64,
    /// Sensitivity updates handed to the frame loop
    pub sensitivity_updates: u64,
    /// Lines that could not be decoded or parsed
    pub rejected: u64,
}

/// Running reader thread and the event channel it feeds
pub struct PoseStream {
    receiver: Receiver<InputEvent>,
    handle: JoinHandle<Result<ReaderStats>>,
}

impl PoseStream {
    /// Channel of events in input order; closes when the input ends
    #[must_use]
    pub const fn receiver(&self) -> &Receiver<InputEvent> {
        &self.receiver
    }

    /// Whether the reader has stopped
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the reader to finish and collect its statistics
    ///
    /// # Errors
    ///
    /// Returns the reader's I/O error, or an error if the thread panicked
    pub fn finish(self) -> Result<ReaderStats> {
        drop(self.receiver);
        self.handle
            .join()
            .map_err(|_| Error::IoError("Pose reader thread panicked".to_string()))?
    }
}

/// Start a thread reading provider lines from `reader`
///
/// Poses and sensitivity updates reach the receiver in input order. Only
/// poses are subject to `overflow`; sensitivity updates always wait for room.
///
/// # Errors
///
/// Returns an error if `capacity` is zero or the thread cannot be spawned
pub fn spawn_reader<R>(mut reader: R, unit: AngleUnit, capacity: usize, overflow: Overflow) -> Result<PoseStream>
where
    R: BufRead + Send + 'static,
{
    if capacity == 0 {
        return Err(Error::InvalidInput("Pose queue capacity must be greater than 0".to_string()));
    }

    let (sender, receiver) = sync_channel(capacity);
    let handle = thread::Builder::new()
        .name("pose-reader".to_string())
        .spawn(move || -> Result<ReaderStats> {
            let mut stats = ReaderStats::default();
            let mut buf = Vec::new();
            loop {
                buf.clear();
                if reader.read_until(b'\n', &mut buf)? == 0 {
                    break;
                }
                stats.lines += 1;

                let line = match std::str::from_utf8(&buf) {
                    Ok(line) => line,
                    Err(e) => {
                        stats.rejected += 1;
                        warn!("Skipping input line {}: not valid UTF-8 ({})", stats.lines, e);
                        continue;
                    }
                };

                let event = match parse_line(line, unit) {
                    Ok(Some(event)) => event,
                    Ok(None) => continue,
                    Err(e) => {
                        stats.rejected += 1;
                        warn!("Skipping input line {}: {}", stats.lines, e);
                        continue;
                    }
                };

                let sent = match (event, overflow) {
                    (InputEvent::Pose(_), Overflow::Drop) => sender.try_send(event),
                    _ => sender.send(event).map_err(|e| TrySendError::Disconnected(e.0)),
                };
                match sent {
                    Ok(()) => match event {
                        InputEvent::Pose(_) => stats.poses_forwarded += 1,
                        InputEvent::Sensitivity(value) => {
                            stats.sensitivity_updates += 1;
                            debug!("Queued sensitivity update to {}", value);
                        }
                    },
                    Err(TrySendError::Full(_)) => {
                        stats.frames_dropped += 1;
                        debug!("Frame loop busy, dropping {:?}", event);
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        debug!("Frame loop stopped, ending pose reader");
                        break;
                    }
                }
            }
            Ok(stats)
        })?;

    Ok(PoseStream { receiver, handle })
}
