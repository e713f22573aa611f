//! IBM Watson translation and text-to-speech backends
//!
//! Thin blocking HTTP clients over the Watson Language Translator v3 and
//! Text to Speech v1 endpoints. Network and auth failures map to
//! [`SpeakError::ServiceUnavailable`]; the loop absorbs them as notices.

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::SpeechSettings;
use crate::error::SpeakError;

use super::{Language, SpeechSynthesizer, Translator};

/// Watson Language Translator client.
pub struct WatsonTranslator {
    client: Client,
    service_url: String,
    api_key: String,
    version: String,
}

impl WatsonTranslator {
    pub fn new(settings: &SpeechSettings) -> Self {
        Self {
            client: Client::new(),
            service_url: settings.translator_url.trim_end_matches('/').to_string(),
            api_key: settings.translator_api_key.clone(),
            version: settings.translator_version.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslationItem>,
}

#[derive(Debug, Deserialize)]
struct TranslationItem {
    translation: String,
}

impl Translator for WatsonTranslator {
    fn translate(&self, text: &str, from: Language, to: Language) -> Result<String, SpeakError> {
        let model_id = format!("{}-{}", from.code(), to.code());
        debug!(%model_id, "requesting translation");

        let response = self
            .client
            .post(format!("{}/v3/translate", self.service_url))
            .basic_auth("apikey", Some(&self.api_key))
            .query(&[("version", self.version.as_str())])
            .json(&serde_json::json!({ "text": [text], "model_id": model_id }))
            .send()
            .map_err(|e| SpeakError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeakError::ServiceUnavailable(format!(
                "translator returned {status}"
            )));
        }

        let body: TranslateResponse = response
            .json()
            .map_err(|e| SpeakError::ServiceUnavailable(format!("bad translator response: {e}")))?;

        body.translations
            .into_iter()
            .next()
            .map(|t| t.translation)
            .ok_or_else(|| SpeakError::ServiceUnavailable("empty translator response".into()))
    }
}

/// Watson Text to Speech client. Synthesizes to MP3.
pub struct WatsonSynthesizer {
    client: Client,
    service_url: String,
    api_key: String,
}

impl WatsonSynthesizer {
    pub fn new(settings: &SpeechSettings) -> Self {
        Self {
            client: Client::new(),
            service_url: settings.tts_url.trim_end_matches('/').to_string(),
            api_key: settings.tts_api_key.clone(),
        }
    }
}

impl SpeechSynthesizer for WatsonSynthesizer {
    fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, SpeakError> {
        info!(%voice, chars = text.len(), "synthesizing speech");

        let response = self
            .client
            .post(format!("{}/v1/synthesize", self.service_url))
            .basic_auth("apikey", Some(&self.api_key))
            .query(&[("voice", voice)])
            .header(ACCEPT, "audio/mp3")
            .json(&serde_json::json!({ "text": text }))
            .send()
            .map_err(|e| SpeakError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SpeakError::ServiceUnavailable(format!(
                "speech service returned {status}"
            )));
        }

        let bytes = response
            .bytes()
            .map_err(|e| SpeakError::ServiceUnavailable(e.to_string()))?;
        debug!(len = bytes.len(), "received audio");
        Ok(bytes.to_vec())
    }
}
