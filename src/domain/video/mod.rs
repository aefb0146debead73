pub mod error;
pub mod model;
pub mod service;
pub mod timeline;

pub use error::VideoServiceError;
pub use model::{PipelineOptions, VideoOutcome};
pub use service::{VideoService, VideoServiceApi, VideoServiceSettings};
pub use timeline::{EntryKind, Timeline, TimelineEntry};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Request for POST /api/videos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoRequest {
    pub text: String,
    pub output_name: String,
    pub voice: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stretch_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_promo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_seconds: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_segmentation: Option<bool>,
}

impl VideoRequest {
    pub fn new(
        text: impl Into<String>,
        output_name: impl Into<String>,
        voice: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            output_name: output_name.into(),
            voice: voice.into(),
            font_size: None,
            background_color: None,
            text_color: None,
            background_image_path: None,
            stretch_background: None,
            include_promo: None,
            max_duration_seconds: None,
            strict_segmentation: None,
        }
    }
}

/// Response for POST /api/videos
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoResponse {
    pub success: bool,
    pub message: String,
    pub output_path: String,
    pub segment_count: usize,
    pub duration_seconds: f64,
}

impl From<VideoOutcome> for VideoResponse {
    fn from(outcome: VideoOutcome) -> Self {
        Self {
            success: true,
            message: outcome.message(),
            output_path: outcome.output_path.to_string_lossy().to_string(),
            segment_count: outcome.segment_count,
            duration_seconds: outcome.duration_seconds,
        }
    }
}
