use crate::domain::tts::SynthesisError;
use crate::error::AppError;
use crate::infrastructure::media::MediaError;

#[derive(Debug, thiserror::Error)]
pub enum VideoServiceError {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("nothing to render: the text contains no sentences")]
    NothingToRender,
    #[error("speech synthesis failed for segment {segment_index}: {source}")]
    Synthesis {
        segment_index: usize,
        #[source]
        source: SynthesisError,
    },
    #[error("encoding failed: {0}")]
    Encoding(#[from] MediaError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<VideoServiceError> for AppError {
    fn from(err: VideoServiceError) -> Self {
        match err {
            VideoServiceError::Configuration(msg) => AppError::BadRequest(msg),
            VideoServiceError::NothingToRender => AppError::UnprocessableEntity(err.to_string()),
            VideoServiceError::Synthesis { .. } => AppError::ExternalService(err.to_string()),
            VideoServiceError::Encoding(e) => AppError::Internal(format!("encoding failed: {}", e)),
            VideoServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
