//! Audio playback via rodio
//!
//! Decodes a synthesized clip and plays it to completion on the default
//! output device, blocking the caller for the duration.

use std::io::Cursor;

use rodio::{Decoder, OutputStream, Sink};
use tracing::debug;

use crate::error::SpeakError;

use super::AudioOutput;

/// Default-device audio output. The output stream is opened per clip and
/// dropped when playback finishes.
pub struct RodioPlayer;

impl RodioPlayer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for RodioPlayer {
    fn play(&mut self, audio: &[u8]) -> Result<(), SpeakError> {
        let (_stream, handle) =
            OutputStream::try_default().map_err(|e| SpeakError::Playback(e.to_string()))?;
        let sink = Sink::try_new(&handle).map_err(|e| SpeakError::Playback(e.to_string()))?;
        let source = Decoder::new(Cursor::new(audio.to_vec()))
            .map_err(|e| SpeakError::Playback(e.to_string()))?;

        debug!(bytes = audio.len(), "playing synthesized audio");
        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}
