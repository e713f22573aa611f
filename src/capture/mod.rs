//! Video Capture Layer
//!
//! The video source is an external collaborator reached through a trait; the
//! keyboard command surface rides alongside it as a channel the display
//! plumbing feeds and the dispatch loop drains once per tick.

pub mod frame;
pub mod replay;

pub use frame::CapturedFrame;
pub use replay::{load_trace, ScriptedTracker, SyntheticVideo, TraceRecord};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::error::CaptureError;

/// The external video collaborator. One frame per call; running out of
/// frames or losing the device are the only fatal conditions in the system.
pub trait VideoSource {
    fn next_frame(&mut self) -> Result<CapturedFrame, CaptureError>;
}

/// Discrete single-key commands. These bypass the gesture pipeline entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Discard every stroke
    ClearCanvas,
    /// Export the canvas to a timestamped quick-save file
    SaveCanvas,
    /// Terminate the dispatch loop
    Quit,
}

/// Channel pair carrying commands from the display plumbing into the loop.
pub struct CommandQueue {
    tx: Sender<Command>,
    rx: Receiver<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Sender handed to whatever owns the keyboard.
    pub fn sender(&self) -> Sender<Command> {
        self.tx.clone()
    }

    /// Drain everything queued since the last tick.
    pub fn drain(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        while let Ok(command) = self.rx.try_recv() {
            commands.push(command);
        }
        commands
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
