//! Gesture classification with temporal debounce
//!
//! Maps the per-tick extension vector to a discrete gesture, then holds each
//! candidate in a rolling window so single-frame tracker jitter can never
//! flip the confirmed state. Without the window, natural tracker noise
//! flickers between drawing and stopping many times per second.

use tracing::debug;

use super::history::StateWindow;
use crate::tracking::FingerFlags;

/// Discrete hand gesture. Recomputed each tick, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    /// No hand in frame (or a garbled observation).
    NoHand,
    /// Hand present, no recognized pose.
    Idle,
    /// Exactly the index finger extended — draw/select pose.
    Pointing,
    /// Two or more digits extended — the deliberate stop pose.
    Stop,
    /// Raised-finger count, emitted only while the counting demo is active.
    Count(u8),
}

/// Debounced gesture classifier.
///
/// A candidate replaces the confirmed state only after it has been observed
/// for the full window; ambiguous oscillation inside the window holds the
/// previously confirmed state rather than guessing.
pub struct GestureClassifier {
    window: StateWindow<GestureState>,
    confirmed: GestureState,
}

impl GestureClassifier {
    pub fn new(debounce_ticks: usize) -> Self {
        Self {
            window: StateWindow::new(debounce_ticks.max(1)),
            confirmed: GestureState::NoHand,
        }
    }

    /// Feed one tick's extension vector (`None` = no hand) and get back the
    /// confirmed gesture. `counting` switches the candidate mapping to raw
    /// finger counts for the demo mode.
    pub fn observe(&mut self, fingers: Option<FingerFlags>, counting: bool) -> GestureState {
        let candidate = Self::candidate(fingers, counting);
        self.window.push(candidate);

        if let Some(stable) = self.window.unanimous() {
            if stable != self.confirmed {
                debug!(?stable, previous = ?self.confirmed, "gesture confirmed");
                self.confirmed = stable;
            }
        }
        self.confirmed
    }

    /// The last confirmed gesture, unchanged by pending candidates.
    pub fn confirmed(&self) -> GestureState {
        self.confirmed
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.confirmed = GestureState::NoHand;
    }

    fn candidate(fingers: Option<FingerFlags>, counting: bool) -> GestureState {
        let Some(flags) = fingers else {
            return GestureState::NoHand;
        };
        if counting {
            return match flags.extended_count() {
                0 => GestureState::Idle,
                n => GestureState::Count(n),
            };
        }
        if flags.only_index() {
            GestureState::Pointing
        } else if flags.extended_count() >= 2 {
            GestureState::Stop
        } else {
            GestureState::Idle
        }
    }
}
