//! Vision/OCR Layer
//!
//! Turns the canvas snapshot into recognized text: preprocessing to help the
//! OCR engine with thick hand-drawn strokes, and a trait boundary for the
//! recognition backend itself (Tesseract CLI in the shipped build).

pub mod preprocess;
pub mod tesseract;

pub use preprocess::prepare_for_ocr;
pub use tesseract::TesseractRecognizer;

use image::GrayImage;

use crate::error::SpeakError;

/// The external OCR collaborator. Input is a preprocessed black-on-white
/// bitmap; output is the recognized text, possibly empty when the engine
/// finds nothing.
pub trait TextRecognizer {
    fn recognize(&self, image: &GrayImage) -> Result<String, SpeakError>;
}
