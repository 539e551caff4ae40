//! Tests for the pose reader thread

use head_scroll::{
    input::{spawn_reader, InputEvent, Overflow, PoseStream},
    pose::{AngleUnit, PoseObservation},
};
use std::{
    io::Cursor,
    thread,
    time::{Duration, Instant},
};

fn reader(text: &str) -> Cursor<Vec<u8>> {
    Cursor::new(text.as_bytes().to_vec())
}

fn poses(stream: &PoseStream) -> Vec<PoseObservation> {
    stream
        .receiver()
        .iter()
        .filter_map(|event| match event {
            InputEvent::Pose(observation) => Some(observation),
            InputEvent::Sensitivity(_) => None,
        })
        .collect()
}

/// Replayed input forwards every pose in order
#[test]
fn test_block_mode_forwards_all_poses() {
    let text = "0.2 0.5\n{\"pitch\": -0.3, \"roll\": 0.0}\n# comment\n\n0.0,-0.5\n";
    let stream = spawn_reader(reader(text), AngleUnit::Radians, 1, Overflow::Block).unwrap();

    assert_eq!(
        poses(&stream),
        vec![
            PoseObservation::new(0.2, 0.5),
            PoseObservation::new(-0.3, 0.0),
            PoseObservation::new(0.0, -0.5),
        ]
    );

    let stats = stream.finish().unwrap();
    assert_eq!(stats.lines, 5);
    assert_eq!(stats.poses_forwarded, 3);
    assert_eq!(stats.frames_dropped, 0);
    assert_eq!(stats.rejected, 0);
}

/// Live input drops poses the frame loop has no room for
#[test]
fn test_drop_mode_drops_when_full() {
    let text = "0.1 0.0\n".repeat(50);
    let stream = spawn_reader(reader(&text), AngleUnit::Radians, 2, Overflow::Drop).unwrap();

    // Leave the queue untouched until the reader is done
    let deadline = Instant::now() + Duration::from_secs(5);
    while !stream.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    let received: Vec<_> = stream.receiver().try_iter().collect();
    let stats = stream.finish().unwrap();

    assert_eq!(received.len(), 2);
    assert_eq!(stats.poses_forwarded, 2);
    assert_eq!(stats.frames_dropped, 48);
    assert_eq!(stats.lines, 50);
}

/// Sensitivity updates travel with the poses, in input order
#[test]
fn test_sensitivity_updates_keep_input_order() {
    let text = "0.3 0.0\n{\"sensitivity\": 9}\n-0.3 0.0\n";
    let stream = spawn_reader(reader(text), AngleUnit::Radians, 1, Overflow::Block).unwrap();

    let events: Vec<_> = stream.receiver().iter().collect();
    let stats = stream.finish().unwrap();

    assert_eq!(
        events,
        vec![
            InputEvent::Pose(PoseObservation::new(0.3, 0.0)),
            InputEvent::Sensitivity(9),
            InputEvent::Pose(PoseObservation::new(-0.3, 0.0)),
        ]
    );
    assert_eq!(stats.sensitivity_updates, 1);
}

/// A full queue drops poses but never sensitivity updates
#[test]
fn test_drop_mode_keeps_sensitivity_updates() {
    let text = format!("{}{{\"sensitivity\": 4}}\n", "0.1 0.0\n".repeat(10));
    let stream = spawn_reader(reader(&text), AngleUnit::Radians, 1, Overflow::Drop).unwrap();

    let events: Vec<_> = stream.receiver().iter().collect();
    let stats = stream.finish().unwrap();

    assert_eq!(events.last(), Some(&InputEvent::Sensitivity(4)));
    assert_eq!(stats.sensitivity_updates, 1);
    assert_eq!(stats.poses_forwarded + stats.frames_dropped, 10);
}

/// Malformed lines are skipped and counted
#[test]
fn test_malformed_lines_rejected() {
    let text = "garbage\n0.1 0.1\nNaN 0.0\n{\"roll\": 1}\n";
    let stream = spawn_reader(reader(text), AngleUnit::Radians, 4, Overflow::Block).unwrap();

    assert_eq!(poses(&stream).len(), 1);
    let stats = stream.finish().unwrap();
    assert_eq!(stats.rejected, 3);
}

/// A line that is not UTF-8 is rejected without ending the stream
#[test]
fn test_invalid_utf8_line_skipped() {
    let bytes = b"0.3 0.0\n\xff\xfe garbage\n0.3 0.0\n0.3 0.0\n".to_vec();
    let stream = spawn_reader(Cursor::new(bytes), AngleUnit::Radians, 8, Overflow::Block).unwrap();

    assert_eq!(poses(&stream).len(), 3);
    let stats = stream.finish().unwrap();
    assert_eq!(stats.lines, 4);
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.poses_forwarded, 3);
}

/// Degree input is converted before reaching the controller
#[test]
fn test_degree_input() {
    let stream = spawn_reader(reader("90 -90\n"), AngleUnit::Degrees, 4, Overflow::Block).unwrap();

    let received = poses(&stream);
    stream.finish().unwrap();

    assert_eq!(received.len(), 1);
    assert!((received[0].pitch - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert!((received[0].roll + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
}
