use super::tts_repository::{TtsProviderError, TtsRepository};
use crate::domain::tts::Voice;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

const SYNTHESIZE_PATH: &str = "/v1/text:synthesize";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: String,
}

/// Google Cloud Text-to-Speech over its REST API.
///
/// Asks for LINEAR16, which comes back as a complete WAV file. The API key
/// travels in a header so it never appears in a URL or an error message.
pub struct GoogleTtsRepository {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GoogleTtsRepository {
    pub fn new(http_client: reqwest::Client, endpoint: String, api_key: String) -> Self {
        Self {
            http_client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn call_google(&self, text: &str, voice: &Voice) -> Result<Vec<u8>, TtsProviderError> {
        let body = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: voice.language_code(),
                name: voice.id,
                ssml_gender: voice.gender.as_str(),
            },
            audio_config: AudioConfig {
                audio_encoding: "LINEAR16",
            },
        };

        let response = self
            .http_client
            .post(format!("{}{}", self.endpoint, SYNTHESIZE_PATH))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsProviderError::Failed(format!("request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = format!("{} {}", status.as_u16(), error_text);
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                TtsProviderError::RateLimited(message)
            } else {
                TtsProviderError::Failed(message)
            });
        }

        let payload: SynthesizeResponse = response
            .json()
            .await
            .map_err(|e| {
                TtsProviderError::Failed(format!("malformed response: {}", e.without_url()))
            })?;

        STANDARD
            .decode(payload.audio_content.as_bytes())
            .map_err(|e| TtsProviderError::Failed(format!("invalid audioContent: {}", e)))
    }
}

#[async_trait]
impl TtsRepository for GoogleTtsRepository {
    async fn synthesize(&self, text: &str, voice: &Voice) -> Result<Vec<u8>, TtsProviderError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            voice = voice.id,
            text_length = text.chars().count(),
            "Calling Google TTS API"
        );

        let result = self.call_google(text, voice).await;
        let duration = start_time.elapsed();

        match &result {
            Ok(audio) => tracing::info!(
                provider = "google",
                voice = voice.id,
                latency_ms = duration.as_millis(),
                audio_size_bytes = audio.len(),
                "TTS synthesis completed"
            ),
            Err(e) => tracing::warn!(
                provider = "google",
                voice = voice.id,
                latency_ms = duration.as_millis(),
                error = %e,
                "TTS synthesis failed"
            ),
        }

        result
    }
}
