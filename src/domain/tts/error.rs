#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("unknown voice '{0}'")]
    UnknownVoice(String),
    #[error("speech service still rate limited after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
    #[error("speech service error: {0}")]
    Fatal(String),
    #[error("invalid audio from speech service: {0}")]
    InvalidAudio(String),
    #[error("failed to store synthesized audio: {0}")]
    Io(#[from] std::io::Error),
}
