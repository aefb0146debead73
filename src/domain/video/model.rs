use crate::domain::segment::SegmentationMode;
use std::path::PathBuf;

/// Knobs that used to be separate pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    pub segmentation: SegmentationMode,
    pub include_promo: bool,
    /// Cut the finished timeline to this many seconds.
    pub max_duration_seconds: Option<f64>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            segmentation: SegmentationMode::Sentences { max_chars: 300 },
            include_promo: true,
            max_duration_seconds: None,
        }
    }
}

/// Result of one successful run, held by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOutcome {
    pub output_path: PathBuf,
    pub segment_count: usize,
    pub duration_seconds: f64,
    pub truncated: bool,
}

impl VideoOutcome {
    pub fn message(&self) -> String {
        let mut message = format!(
            "Video created with {} segment(s), {:.2}s",
            self.segment_count, self.duration_seconds
        );
        if self.truncated {
            message.push_str(" (truncated to duration cap)");
        }
        message
    }
}
