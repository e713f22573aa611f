//! Speech Layer
//!
//! Translation, speech synthesis and audio playback collaborators behind
//! traits. The shipped implementations talk to the IBM Watson HTTP services
//! and play the returned audio through rodio; tests substitute mocks.

pub mod playback;
pub mod watson;

pub use playback::RodioPlayer;
pub use watson::{WatsonSynthesizer, WatsonTranslator};

use crate::error::SpeakError;

/// Output language for the speak pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
}

impl Language {
    /// Two-letter code used in translation model ids (e.g. `en-fr`).
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
        }
    }
}

/// The external translation collaborator.
pub trait Translator {
    fn translate(&self, text: &str, from: Language, to: Language) -> Result<String, SpeakError>;
}

/// The external speech-synthesis collaborator. Returns encoded audio
/// (MP3 from the Watson backend) ready for an [`AudioOutput`].
pub trait SpeechSynthesizer {
    fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeakError>;
}

/// Plays a synthesized clip to completion. Blocking is deliberate: speaking
/// is a rare, explicit user action and the loop pauses for it.
pub trait AudioOutput {
    fn play(&mut self, audio: &[u8]) -> Result<(), SpeakError>;
}
