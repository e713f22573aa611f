//! Mode & Intent Layer
//!
//! Combines the confirmed gesture with the fingertip position to decide the
//! active application mode and emit discrete intent events for the canvas
//! and the speak pipeline.

pub mod header;
pub mod machine;

pub use header::{HeaderButton, HeaderLayout};
pub use machine::ModeMachine;

use crate::speech::Language;
use crate::tracking::Point;

/// The sticky application mode. Persists across ticks until a header
/// selection (or a momentary action completing) changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintMode {
    /// Waiting for a selection; no canvas mutation.
    Idle,
    /// Index fingertip draws ink strokes.
    Draw,
    /// Index fingertip paints background over existing ink.
    Erase,
    /// Momentary: export the canvas, then back to Idle.
    Save,
    /// Momentary: recognize the canvas text and speak it in English.
    SpeakEn,
    /// Momentary: recognize, translate to French, and speak.
    SpeakFr,
    /// Demo mode: display the raised-finger count.
    FingerCounter,
}

impl PaintMode {
    /// Modes that arm the fingertip for canvas mutation.
    pub fn is_drawing(&self) -> bool {
        matches!(self, PaintMode::Draw | PaintMode::Erase)
    }
}

impl std::fmt::Display for PaintMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PaintMode::Idle => "idle",
            PaintMode::Draw => "drawing",
            PaintMode::Erase => "eraser",
            PaintMode::Save => "save",
            PaintMode::SpeakEn => "speak english",
            PaintMode::SpeakFr => "speak french",
            PaintMode::FingerCounter => "finger counter",
        };
        f.write_str(label)
    }
}

/// Discrete events emitted by the state machine, applied by the dispatch
/// loop. Low-frequency by construction: every one of these is the product of
/// a debounced gesture, never a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IntentEvent {
    /// A header button confirmed; the mode changed.
    ModeSelected(PaintMode),
    /// Extend (or begin) the open ink stroke at this canvas point.
    DrawTo(Point),
    /// Stamp background over the canvas at this point.
    EraseAt(Point),
    /// Close the open stroke; it becomes immutable.
    SealStroke,
    /// Discard every stroke.
    ClearCanvas,
    /// Export the canvas image.
    SaveCanvas,
    /// Run the recognize-and-speak pipeline.
    Speak(Language),
    /// Counting demo readout.
    FingersCounted(u8),
}
