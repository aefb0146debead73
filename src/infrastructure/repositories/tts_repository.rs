use crate::domain::tts::Voice;
use async_trait::async_trait;

/// Failure reported by a speech provider.
///
/// Providers classify their own failures so callers never inspect messages
/// to decide whether to retry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TtsProviderError {
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("synthesis failed: {0}")]
    Failed(String),
}

impl TtsProviderError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, TtsProviderError::RateLimited(_))
    }
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying speech provider.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize one segment with the given voice.
    ///
    /// Returns a WAV (LINEAR16) payload. One call is one request to the
    /// provider; retrying is the caller's business.
    async fn synthesize(&self, text: &str, voice: &Voice) -> Result<Vec<u8>, TtsProviderError>;
}
