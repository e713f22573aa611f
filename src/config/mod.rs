//! Application Configuration
//!
//! User settings and tuning constants stored in TOML format. Every
//! empirically calibrated threshold in the gesture pipeline lives here
//! rather than in code.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::speech::Language;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Canvas geometry and export targets
    pub canvas: CanvasSettings,
    /// Gesture interpretation tuning
    pub gesture: GestureSettings,
    /// Brush geometry and stroke smoothing
    pub brush: BrushSettings,
    /// OCR backend and preprocessing
    pub ocr: OcrSettings,
    /// Translation and speech synthesis services
    pub speech: SpeechSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSettings::default(),
            gesture: GestureSettings::default(),
            brush: BrushSettings::default(),
            ocr: OcrSettings::default(),
            speech: SpeechSettings::default(),
        }
    }
}

/// Canvas geometry and export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanvasSettings {
    /// Canvas (and frame) width in pixels
    pub width: u32,
    /// Canvas (and frame) height in pixels
    pub height: u32,
    /// Height of the header button strip in pixels
    pub header_height: u32,
    /// Export target for the save button
    pub export_path: PathBuf,
    /// Filename prefix for keyboard quick-saves
    pub quicksave_prefix: String,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            header_height: 137,
            export_path: PathBuf::from("portfolio_canvas.png"),
            quicksave_prefix: "quicksave_".to_string(),
        }
    }
}

/// Gesture interpretation tuning constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureSettings {
    /// Margin (normalized units) a tip must clear past its joint to count
    /// as extended
    pub extension_margin: f32,
    /// Consecutive identical ticks before a gesture candidate is confirmed
    pub debounce_ticks: usize,
    /// Consecutive ticks a fingertip must dwell on a header button
    pub hover_confirm_ticks: u32,
    /// Ticks after a mode switch during which the header is inert
    pub mode_cooldown_ticks: u32,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            extension_margin: 0.04,
            debounce_ticks: 3,
            hover_confirm_ticks: 5,
            mode_cooldown_ticks: 30,
        }
    }
}

/// Brush geometry and stroke smoothing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrushSettings {
    /// Ink stamp diameter in pixels
    pub thickness: f32,
    /// Erase stamp diameter in pixels
    pub eraser_thickness: f32,
    /// Display color of ink strokes (RGB)
    pub color: [u8; 3],
    /// Raw points averaged per committed stroke point
    pub smoothing_window: usize,
    /// Minimum pixel distance between committed stroke points
    pub min_point_spacing: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            thickness: 25.0,
            eraser_thickness: 100.0,
            color: [255, 0, 255],
            smoothing_window: 3,
            min_point_spacing: 2.0,
        }
    }
}

/// OCR backend and preprocessing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Recognition executable name or path
    pub command: String,
    /// Working width the snapshot is scaled to before recognition
    pub target_width: u32,
    /// Working height the snapshot is scaled to before recognition
    pub target_height: u32,
    /// Binarization threshold (0-255)
    pub threshold: u8,
    /// Apply a 3x3 median blur after thresholding
    pub median_blur: bool,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            target_width: 640,
            target_height: 480,
            threshold: 150,
            median_blur: true,
        }
    }
}

/// Translation and speech synthesis service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Text to Speech service URL
    pub tts_url: String,
    /// Text to Speech API key
    pub tts_api_key: String,
    /// Language Translator service URL
    pub translator_url: String,
    /// Language Translator API key
    pub translator_api_key: String,
    /// Language Translator API version date
    pub translator_version: String,
    /// English voice model
    pub voice_en: String,
    /// French voice model
    pub voice_fr: String,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            tts_url: "https://api.us-east.text-to-speech.watson.cloud.ibm.com".to_string(),
            tts_api_key: String::new(),
            translator_url: "https://api.us-south.language-translator.watson.cloud.ibm.com"
                .to_string(),
            translator_api_key: String::new(),
            translator_version: "2018-05-01".to_string(),
            voice_en: "en-US_EmmaExpressive".to_string(),
            voice_fr: "fr-FR_ReneeV3Voice".to_string(),
        }
    }
}

impl SpeechSettings {
    /// Voice model for a target language.
    pub fn voice_for(&self, language: Language) -> &str {
        match language {
            Language::English => &self.voice_en,
            Language::French => &self.voice_fr,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Platform config file location (`config.toml` under the app config dir).
pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "painttotalk", "PaintToTalk")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    let config_dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert_eq!(config.canvas.width, 1280);
        assert_eq!(config.canvas.height, 720);
        assert_eq!(config.canvas.header_height, 137);

        assert!((config.gesture.extension_margin - 0.04).abs() < 1e-6);
        assert_eq!(config.gesture.debounce_ticks, 3);
        assert_eq!(config.gesture.hover_confirm_ticks, 5);
        assert_eq!(config.gesture.mode_cooldown_ticks, 30);

        assert!((config.brush.thickness - 25.0).abs() < f32::EPSILON);
        assert!((config.brush.eraser_thickness - 100.0).abs() < f32::EPSILON);
        assert_eq!(config.brush.color, [255, 0, 255]);

        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.ocr.threshold, 150);
        assert!(config.ocr.median_blur);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.canvas.width, config.canvas.width);
        assert_eq!(parsed.gesture.debounce_ticks, config.gesture.debounce_ticks);
        assert_eq!(parsed.brush.color, config.brush.color);
        assert_eq!(parsed.speech.voice_en, config.speech.voice_en);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.gesture.debounce_ticks = 5;
        config.brush.thickness = 12.0;
        config.speech.tts_api_key = "secret".to_string();

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.gesture.debounce_ticks, 5);
        assert!((parsed.brush.thickness - 12.0).abs() < f32::EPSILON);
        assert_eq!(parsed.speech.tts_api_key, "secret");
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(loaded.canvas.export_path, config.canvas.export_path);
        assert_eq!(loaded.ocr.command, config.ocr.command);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_voice_for_language() {
        let settings = SpeechSettings::default();
        assert_eq!(settings.voice_for(Language::English), "en-US_EmmaExpressive");
        assert_eq!(settings.voice_for(Language::French), "fr-FR_ReneeV3Voice");
    }
}
