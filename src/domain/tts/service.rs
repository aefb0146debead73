use super::error::SynthesisError;
use super::voice::Voice;
use crate::infrastructure::repositories::{TtsProviderError, TtsRepository};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::NamedTempFile;

/// Bounded exponential backoff for rate-limited synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay unit; retry `n` waits `base_delay * 2^n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry)
    }
}

/// Synthesized audio for one segment.
///
/// The WAV payload lives in a temporary file that is deleted when this value
/// is dropped, whichever way the run ends.
#[derive(Debug)]
pub struct SynthesisResult {
    audio: NamedTempFile,
    pub duration_seconds: f64,
    pub voice_id: &'static str,
}

impl SynthesisResult {
    pub fn path(&self) -> &Path {
        self.audio.path()
    }
}

/// Turns a segment into a WAV file on disk, retrying on rate limits.
pub struct SpeechSynthesizer {
    tts_repo: Arc<dyn TtsRepository>,
    retry: RetryPolicy,
    temp_dir: PathBuf,
}

impl SpeechSynthesizer {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, retry: RetryPolicy, temp_dir: PathBuf) -> Self {
        Self {
            tts_repo,
            retry,
            temp_dir,
        }
    }

    /// Check a voice id against the voice table without touching the network.
    pub fn resolve_voice(voice_id: &str) -> Result<&'static Voice, SynthesisError> {
        Voice::find(voice_id).ok_or_else(|| SynthesisError::UnknownVoice(voice_id.to_string()))
    }

    pub async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
    ) -> Result<SynthesisResult, SynthesisError> {
        let voice = Self::resolve_voice(voice_id)?;

        let audio_bytes = self.request_with_retry(text, voice).await?;
        let duration_seconds = wav_duration_seconds(&audio_bytes)?;

        let mut audio = tempfile::Builder::new()
            .prefix("segment-")
            .suffix(".wav")
            .tempfile_in(&self.temp_dir)?;
        audio.write_all(&audio_bytes)?;
        audio.flush()?;

        tracing::debug!(
            voice = voice.id,
            audio_size = audio_bytes.len(),
            duration_secs = duration_seconds,
            path = %audio.path().display(),
            "Segment audio stored"
        );

        Ok(SynthesisResult {
            audio,
            duration_seconds,
            voice_id: voice.id,
        })
    }

    async fn request_with_retry(
        &self,
        text: &str,
        voice: &Voice,
    ) -> Result<Vec<u8>, SynthesisError> {
        let mut retries = 0;

        loop {
            let attempt = retries + 1;
            match self.tts_repo.synthesize(text, voice).await {
                Ok(bytes) => {
                    if retries > 0 {
                        tracing::info!(
                            attempt,
                            voice = voice.id,
                            "Synthesis succeeded after retry"
                        );
                    }
                    return Ok(bytes);
                }
                Err(e @ TtsProviderError::RateLimited(_)) if retries < self.retry.max_retries => {
                    retries += 1;
                    let delay = self.retry.delay_for(retries);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts(),
                        delay_secs = delay.as_secs_f64(),
                        error = %e,
                        "Speech service rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_retryable() => {
                    tracing::error!(attempt, error = %e, "Synthesis retry budget exhausted");
                    return Err(SynthesisError::RetriesExhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Synthesis failed");
                    return Err(SynthesisError::Fatal(e.to_string()));
                }
            }
        }
    }
}

/// Playback length of a WAV payload.
pub fn wav_duration_seconds(bytes: &[u8]) -> Result<f64, SynthesisError> {
    let reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| SynthesisError::InvalidAudio(e.to_string()))?;
    let sample_rate = reader.spec().sample_rate;
    if sample_rate == 0 {
        return Err(SynthesisError::InvalidAudio("zero sample rate".to_string()));
    }
    Ok(reader.duration() as f64 / sample_rate as f64)
}
