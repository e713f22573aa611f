//! Trace replay plumbing
//!
//! Drives the full dispatch loop from a recorded landmark trace instead of a
//! live camera and tracker. One JSON object per line:
//!
//! ```text
//! {"landmarks": [[0.5, 0.9], ...21 pairs...]}
//! {"landmarks": null}
//! {"landmarks": null, "command": "save"}
//! ```

use std::collections::VecDeque;
use std::path::Path;

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::CaptureError;
use crate::tracking::{HandTracker, LandmarkSet, Point};

use super::{CapturedFrame, Command, VideoSource};

/// One trace line: an optional hand observation plus an optional scripted
/// keyboard command for the same tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    #[serde(default)]
    pub landmarks: Option<Vec<[f32; 2]>>,
    #[serde(default)]
    pub command: Option<String>,
}

/// Parse a JSON Lines trace file.
pub fn load_trace(path: &Path) -> Result<Vec<TraceRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trace {}", path.display()))?;

    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: TraceRecord = serde_json::from_str(line)
            .with_context(|| format!("bad trace record on line {}", index + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Video source producing one blank frame per trace record.
pub struct SyntheticVideo {
    width: u32,
    height: u32,
    remaining: usize,
}

impl SyntheticVideo {
    pub fn new(width: u32, height: u32, frames: usize) -> Self {
        Self {
            width,
            height,
            remaining: frames,
        }
    }
}

impl VideoSource for SyntheticVideo {
    fn next_frame(&mut self) -> Result<CapturedFrame, CaptureError> {
        if self.remaining == 0 {
            return Err(CaptureError::EndOfStream);
        }
        self.remaining -= 1;
        Ok(CapturedFrame::blank(self.width, self.height))
    }
}

/// Tracker that replays recorded observations, forwarding scripted commands
/// onto the keyboard channel as their tick comes up.
pub struct ScriptedTracker {
    records: VecDeque<TraceRecord>,
    commands: Sender<Command>,
}

impl ScriptedTracker {
    pub fn new(records: Vec<TraceRecord>, commands: Sender<Command>) -> Self {
        Self {
            records: records.into(),
            commands,
        }
    }
}

impl HandTracker for ScriptedTracker {
    fn detect(&mut self, _frame: &CapturedFrame) -> Option<LandmarkSet> {
        let record = self.records.pop_front()?;

        if let Some(command) = record.command.as_deref() {
            let command = match command {
                "clear" => Some(Command::ClearCanvas),
                "save" => Some(Command::SaveCanvas),
                "quit" => Some(Command::Quit),
                other => {
                    warn!(command = other, "unknown trace command ignored");
                    None
                }
            };
            if let Some(command) = command {
                let _ = self.commands.send(command);
            }
        }

        let points = record
            .landmarks?
            .into_iter()
            .map(|[x, y]| Point::new(x, y))
            .collect();
        // A record with the wrong point count is a garbled observation.
        LandmarkSet::from_points(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CommandQueue;
    use crate::tracking::LANDMARK_COUNT;
    use std::io::Write;

    fn full_hand_line() -> String {
        let points: Vec<[f32; 2]> = vec![[0.5, 0.5]; LANDMARK_COUNT];
        serde_json::to_string(&TraceRecord {
            landmarks: Some(points),
            command: None,
        })
        .unwrap()
    }

    #[test]
    fn test_load_trace_parses_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", full_hand_line()).unwrap();
        writeln!(file).unwrap();
        writeln!(file, "{{\"landmarks\": null, \"command\": \"quit\"}}").unwrap();

        let records = load_trace(file.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].landmarks.is_some());
        assert_eq!(records[1].command.as_deref(), Some("quit"));
    }

    #[test]
    fn test_load_trace_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not json").unwrap();
        assert!(load_trace(file.path()).is_err());
    }

    #[test]
    fn test_synthetic_video_ends() {
        let mut video = SyntheticVideo::new(64, 48, 2);
        assert!(video.next_frame().is_ok());
        assert!(video.next_frame().is_ok());
        assert!(matches!(
            video.next_frame(),
            Err(CaptureError::EndOfStream)
        ));
    }

    #[test]
    fn test_scripted_tracker_replays_and_forwards_commands() {
        let queue = CommandQueue::new();
        let records = vec![
            serde_json::from_str::<TraceRecord>(&full_hand_line()).unwrap(),
            TraceRecord {
                landmarks: None,
                command: Some("clear".to_string()),
            },
            TraceRecord {
                // 3 points: garbled, must read as no hand.
                landmarks: Some(vec![[0.1, 0.1]; 3]),
                command: None,
            },
        ];
        let mut tracker = ScriptedTracker::new(records, queue.sender());
        let frame = CapturedFrame::blank(64, 48);

        assert!(tracker.detect(&frame).is_some());
        assert!(tracker.detect(&frame).is_none());
        assert!(tracker.detect(&frame).is_none());
        assert_eq!(queue.drain(), vec![Command::ClearCanvas]);
    }
}
