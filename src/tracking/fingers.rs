//! Finger extension detection
//!
//! Reduces a raw landmark set to a per-digit extension vector plus the
//! fingertip reference point. Pure transform, recomputed every tick.

use super::landmarks::{LandmarkSet, Point, FINGER_JOINTS, FINGER_TIPS, WRIST};

/// Per-digit extension flags, thumb through pinky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerFlags {
    flags: [bool; 5],
}

impl FingerFlags {
    pub fn new(flags: [bool; 5]) -> Self {
        Self { flags }
    }

    /// Sentinel vector for ticks with no detected hand.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_extended(&self, digit: usize) -> bool {
        self.flags[digit]
    }

    /// Number of extended digits.
    pub fn extended_count(&self) -> u8 {
        self.flags.iter().filter(|f| **f).count() as u8
    }

    /// Exactly the index finger extended — the drawing pose.
    pub fn only_index(&self) -> bool {
        self.flags == [false, true, false, false, false]
    }

    /// All five digits extended — the open-palm pose.
    pub fn all_extended(&self) -> bool {
        self.flags == [true; 5]
    }
}

/// A normalized reading of one hand for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandReading {
    pub fingers: FingerFlags,
    /// Index fingertip in normalized coordinates.
    pub fingertip: Point,
}

/// Derive the extension vector and fingertip from a landmark set.
///
/// A finger counts as extended when its tip sits farther from the wrist
/// anchor than its lower joint by more than `margin` (normalized units);
/// readings inside the margin are treated as retracted so near-threshold
/// noise cannot flip the flag. The thumb extends laterally rather than
/// radially, so it compares x-axis displacement from the wrist instead.
pub fn read_hand(landmarks: &LandmarkSet, margin: f32) -> HandReading {
    let wrist = landmarks.point(WRIST);
    let mut flags = [false; 5];

    // Thumb: lateral displacement test.
    let thumb_tip = landmarks.point(FINGER_TIPS[0]);
    let thumb_joint = landmarks.point(FINGER_JOINTS[0]);
    flags[0] = (thumb_tip.x - wrist.x).abs() > (thumb_joint.x - wrist.x).abs() + margin;

    // Four fingers: radial tip-vs-joint distance from the wrist.
    for digit in 1..5 {
        let tip = landmarks.point(FINGER_TIPS[digit]);
        let joint = landmarks.point(FINGER_JOINTS[digit]);
        flags[digit] = tip.distance(wrist) > joint.distance(wrist) + margin;
    }

    HandReading {
        fingers: FingerFlags::new(flags),
        fingertip: landmarks.fingertip(),
    }
}
