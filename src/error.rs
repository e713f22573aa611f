//! Error taxonomy
//!
//! Gesture- and canvas-layer problems are absorbed locally and degrade to a
//! safe idle state; only losing the video source is allowed to end the loop.

use thiserror::Error;

/// Failures inside the snapshot → OCR → translate → synthesize → play
/// pipeline. All of these abort the pipeline, leave the canvas untouched and
/// surface as a transient on-screen notice.
#[derive(Debug, Error)]
pub enum SpeakError {
    /// OCR ran but found nothing readable on the canvas.
    #[error("no readable text on the canvas")]
    RecognitionEmpty,

    /// The recognition backend itself failed (missing executable, bad exit).
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Translation or speech service unreachable, or credentials rejected.
    #[error("speech service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Synthesized audio could not be decoded or played.
    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// Failures of the video source. These are the only fatal errors: the
/// dispatch loop terminates cleanly when the source is gone.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The source produced no more frames (end of a replay trace).
    #[error("video source exhausted")]
    EndOfStream,

    /// The device or stream failed irrecoverably.
    #[error("video source lost: {0}")]
    SourceLost(String),
}
