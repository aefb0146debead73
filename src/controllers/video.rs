use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::{
        tts::{VoiceResponse, VOICES},
        video::{VideoRequest, VideoResponse, VideoServiceApi},
    },
    error::{AppError, AppResult},
};

pub struct VideoController {
    video_service: Arc<dyn VideoServiceApi>,
}

impl VideoController {
    pub fn new(video_service: Arc<dyn VideoServiceApi>) -> Self {
        Self { video_service }
    }

    /// POST /api/videos - Render text into a narrated video
    ///
    /// Blocks until the file is written or the run fails.
    pub async fn create_video(
        State(controller): State<Arc<VideoController>>,
        Json(request): Json<VideoRequest>,
    ) -> AppResult<Json<VideoResponse>> {
        tracing::info!(
            output_name = %request.output_name,
            voice = %request.voice,
            text_length = request.text.chars().count(),
            "Video requested"
        );

        let outcome = controller
            .video_service
            .build_video(request)
            .await
            .map_err(AppError::from)?;

        Ok(Json(VideoResponse::from(outcome)))
    }

    /// GET /api/voices - Voices a render may use
    pub async fn list_voices() -> Json<Vec<VoiceResponse>> {
        Json(VOICES.iter().map(VoiceResponse::from).collect())
    }
}
