pub mod error;
pub mod service;
pub mod voice;

pub use error::SynthesisError;
pub use service::{RetryPolicy, SpeechSynthesizer, SynthesisResult};
pub use voice::{Voice, VoiceGender, DEFAULT_VOICE, VOICES};
use serde::Serialize;

/// Entry of GET /api/voices
#[derive(Debug, Serialize)]
pub struct VoiceResponse {
    pub id: &'static str,
    pub gender: VoiceGender,
    pub language_code: &'static str,
}

impl From<&Voice> for VoiceResponse {
    fn from(voice: &Voice) -> Self {
        Self {
            id: voice.id,
            gender: voice.gender,
            language_code: voice.language_code(),
        }
    }
}
