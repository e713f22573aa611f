//! Tesseract CLI recognition backend
//!
//! Writes the prepared bitmap to a temporary file and invokes the
//! `tesseract` executable with stdout output, the same engine the original
//! interface drove through pytesseract.

use std::path::PathBuf;
use std::process::Command;

use image::GrayImage;
use tracing::{debug, warn};

use crate::error::SpeakError;

use super::TextRecognizer;

/// OCR via the system `tesseract` binary.
pub struct TesseractRecognizer {
    command: PathBuf,
}

impl TesseractRecognizer {
    /// `command` is the executable name or full path (config `[ocr] command`).
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("paint-to-talk-ocr-{}.png", std::process::id()))
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, SpeakError> {
        let input = Self::scratch_path();
        image
            .save(&input)
            .map_err(|e| SpeakError::Recognition(format!("failed to stage OCR input: {e}")))?;

        let output = Command::new(&self.command)
            .arg(&input)
            .arg("stdout")
            .output();

        if let Err(e) = std::fs::remove_file(&input) {
            warn!(path = %input.display(), "could not remove OCR scratch file: {e}");
        }

        let output = output.map_err(|e| {
            SpeakError::Recognition(format!("failed to run {}: {e}", self.command.display()))
        })?;

        if !output.status.success() {
            return Err(SpeakError::Recognition(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(chars = text.len(), "tesseract output");
        Ok(text)
    }
}
