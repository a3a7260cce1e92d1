use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{RepetitorError, Result};

/// Fixed speech-synthesis configuration. One voice, one model; narration
/// chunking for very long scripts is the provider's problem, not ours.
pub struct VoiceConfig {
    pub api_url: &'static str,
    /// ElevenLabs voice id for "Rachel".
    pub voice_id: &'static str,
    pub model_id: &'static str,
    pub env_var: &'static str,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        VoiceConfig {
            api_url: "https://api.elevenlabs.io/v1/text-to-speech",
            voice_id: "21m00Tcm4TlvDq8ikWAM",
            model_id: "eleven_multilingual_v2",
            env_var: "ELEVENLABS_API_KEY",
        }
    }
}

impl VoiceConfig {
    /// Validate that the narration API key is set. Narration cannot fall
    /// back to anything, so a missing key is fatal for the whole process
    /// and is checked once before any topic is attempted.
    pub fn validate_api_key(&self) -> Result<String> {
        match std::env::var(self.env_var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(RepetitorError::MissingApiKey {
                env_var: self.env_var.to_string(),
            }),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_url, self.voice_id)
    }
}

/// Synthesize narration audio and write it verbatim to `dest`. Transport
/// and provider errors come back as [`RepetitorError::NarrationFailed`] so
/// the orchestrator can apply its stage-failure policy uniformly.
pub async fn record_voiceover(
    text: &str,
    dest: &Path,
    api_key: &str,
    config: &VoiceConfig,
) -> Result<PathBuf> {
    let narration_failed = |reason: String| RepetitorError::NarrationFailed {
        dest: dest.to_path_buf(),
        reason,
    };

    let response = reqwest::Client::new()
        .post(config.endpoint())
        .header("xi-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&serde_json::json!({
            "text": text,
            "model_id": config.model_id,
        }))
        .send()
        .await
        .map_err(|e| narration_failed(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(narration_failed(format!("{status}: {body}")));
    }

    let audio = response
        .bytes()
        .await
        .map_err(|e| narration_failed(e.to_string()))?;
    fs::write(dest, &audio).await?;

    Ok(dest.to_path_buf())
}
