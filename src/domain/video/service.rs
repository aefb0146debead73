use super::error::VideoServiceError;
use super::model::{PipelineOptions, VideoOutcome};
use super::timeline::Timeline;
use super::VideoRequest;
use crate::domain::caption::{
    BackgroundImage, BackgroundMode, CaptionRenderer, CaptionStyle, Color, PromoContent,
    DEFAULT_FONT_SIZE, MAX_FONT_SIZE, MIN_FONT_SIZE,
};
use crate::domain::segment::{segment, Segment, SegmentationMode};
use crate::domain::tts::{SpeechSynthesizer, Voice};
use crate::infrastructure::media::{EncodeSettings, EncodingSink};
use crate::infrastructure::repositories::LogoRepository;
use async_trait::async_trait;
use image::{RgbImage, RgbaImage};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

fn output_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static output name pattern"))
}

/// Service-wide settings, fixed at startup.
#[derive(Debug, Clone)]
pub struct VideoServiceSettings {
    pub output_dir: PathBuf,
    pub logo_url: String,
    /// Pause between two segments, to stay under the speech service quota.
    pub segment_delay: Duration,
    pub max_segment_chars: usize,
    pub max_segment_words: usize,
    pub encode: EncodeSettings,
    pub promo: PromoContent,
}

/// A request that passed validation; nothing in here can fail a run anymore.
#[derive(Debug)]
struct RenderJob {
    text: String,
    voice: &'static Voice,
    output_path: PathBuf,
    style: CaptionStyle,
    background: Option<(PathBuf, BackgroundMode)>,
    options: PipelineOptions,
}

pub struct VideoService {
    synthesizer: SpeechSynthesizer,
    renderer: Arc<CaptionRenderer>,
    logo_repo: Arc<dyn LogoRepository>,
    encoder: Arc<dyn EncodingSink>,
    settings: VideoServiceSettings,
}

impl VideoService {
    pub fn new(
        synthesizer: SpeechSynthesizer,
        renderer: Arc<CaptionRenderer>,
        logo_repo: Arc<dyn LogoRepository>,
        encoder: Arc<dyn EncodingSink>,
        settings: VideoServiceSettings,
    ) -> Self {
        Self {
            synthesizer,
            renderer,
            logo_repo,
            encoder,
            settings,
        }
    }
}

#[async_trait]
pub trait VideoServiceApi: Send + Sync {
    /// Turn the request's text into one narrated video under the output dir.
    async fn build_video(&self, request: VideoRequest) -> Result<VideoOutcome, VideoServiceError>;

    /// Whether a render could currently be encoded.
    fn encoder_available(&self) -> bool;
}

#[async_trait]
impl VideoServiceApi for VideoService {
    async fn build_video(&self, request: VideoRequest) -> Result<VideoOutcome, VideoServiceError> {
        let started = Instant::now();
        let job = self.prepare(request)?;

        let segments = segment(&job.text, job.options.segmentation);
        if segments.is_empty() {
            tracing::info!(
                output = %job.output_path.display(),
                "No sentences in input, nothing to render"
            );
            return Err(VideoServiceError::NothingToRender);
        }

        tracing::info!(
            segments = segments.len(),
            voice = job.voice.id,
            include_promo = job.options.include_promo,
            max_duration_secs = ?job.options.max_duration_seconds,
            output = %job.output_path.display(),
            "Starting video render"
        );

        let style = Arc::new(
            self.with_background(job.style.clone(), job.background.as_ref())
                .await,
        );

        let mut timeline = Timeline::new();
        self.narrate(&segments, job.voice, &style, &mut timeline).await?;

        if job.options.include_promo {
            let image = self.render_promotional(&style).await?;
            timeline.push_promotional(image, self.settings.promo.duration_seconds);
        }

        let truncated = match job.options.max_duration_seconds {
            Some(cap) => timeline.truncate(cap),
            None => false,
        };

        let duration_seconds = timeline.total_duration();
        let segment_count = segments.len();

        tokio::fs::create_dir_all(&self.settings.output_dir)
            .await
            .map_err(|e| anyhow::anyhow!("failed to create output directory: {}", e))?;

        self.encoder
            .encode(timeline, &job.output_path, &self.settings.encode)
            .await?;

        tracing::info!(
            segments = segment_count,
            duration_secs = duration_seconds,
            truncated = truncated,
            elapsed_ms = started.elapsed().as_millis(),
            output = %job.output_path.display(),
            "Video render completed"
        );

        Ok(VideoOutcome {
            output_path: job.output_path,
            segment_count,
            duration_seconds,
            truncated,
        })
    }

    fn encoder_available(&self) -> bool {
        self.encoder.is_available()
    }
}

impl VideoService {
    fn prepare(&self, request: VideoRequest) -> Result<RenderJob, VideoServiceError> {
        let voice = SpeechSynthesizer::resolve_voice(&request.voice)
            .map_err(|e| VideoServiceError::Configuration(e.to_string()))?;

        if !output_name_pattern().is_match(&request.output_name) {
            return Err(VideoServiceError::Configuration(format!(
                "output name '{}' may only contain letters, digits, '-' and '_'",
                request.output_name
            )));
        }
        let output_path = self
            .settings
            .output_dir
            .join(format!("{}.mp4", request.output_name));

        let font_size = request.font_size.unwrap_or(DEFAULT_FONT_SIZE);
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&font_size) {
            return Err(VideoServiceError::Configuration(format!(
                "font size must be between {} and {}, got {}",
                MIN_FONT_SIZE, MAX_FONT_SIZE, font_size
            )));
        }

        let background_color = parse_color(request.background_color.as_deref(), Color::BLACK)?;
        let text_color = parse_color(request.text_color.as_deref(), Color::WHITE)?;

        if let Some(cap) = request.max_duration_seconds {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(VideoServiceError::Configuration(format!(
                    "max duration must be a positive number of seconds, got {}",
                    cap
                )));
            }
        }

        let segmentation = if request.strict_segmentation.unwrap_or(false) {
            SegmentationMode::SentencesThenWords {
                max_chars: self.settings.max_segment_chars,
                max_words: self.settings.max_segment_words,
            }
        } else {
            SegmentationMode::Sentences {
                max_chars: self.settings.max_segment_chars,
            }
        };

        let mode = if request.stretch_background.unwrap_or(false) {
            BackgroundMode::Stretch
        } else {
            BackgroundMode::Letterbox
        };

        Ok(RenderJob {
            text: request.text,
            voice,
            output_path,
            style: CaptionStyle {
                font_size,
                background_color,
                text_color,
                background: None,
            },
            background: request.background_image_path.map(|path| (path, mode)),
            options: PipelineOptions {
                segmentation,
                include_promo: request.include_promo.unwrap_or(true),
                max_duration_seconds: request.max_duration_seconds,
            },
        })
    }

    /// Load the background image once per run. A bad image only costs the
    /// run its background.
    async fn with_background(
        &self,
        mut style: CaptionStyle,
        background: Option<&(PathBuf, BackgroundMode)>,
    ) -> CaptionStyle {
        let Some((path, mode)) = background else {
            return style;
        };

        match load_background(path).await {
            Ok(image) => {
                tracing::debug!(
                    path = %path.display(),
                    width = image.width(),
                    height = image.height(),
                    mode = ?mode,
                    "Background image loaded"
                );
                style.background = Some(BackgroundImage { image, mode: *mode });
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load background image, using solid color"
                );
            }
        }
        style
    }

    /// Synthesize and caption every segment in order.
    async fn narrate(
        &self,
        segments: &[Segment],
        voice: &'static Voice,
        style: &Arc<CaptionStyle>,
        timeline: &mut Timeline,
    ) -> Result<(), VideoServiceError> {
        for (position, segment) in segments.iter().enumerate() {
            if position > 0 && !self.settings.segment_delay.is_zero() {
                tokio::time::sleep(self.settings.segment_delay).await;
            }

            tracing::debug!(
                segment_index = segment.index,
                chars = segment.text.chars().count(),
                "Processing segment"
            );

            let audio = self
                .synthesizer
                .synthesize(&segment.text, voice.id)
                .await
                .map_err(|source| VideoServiceError::Synthesis {
                    segment_index: segment.index,
                    source,
                })?;

            let image = self.render_caption(&segment.text, style).await?;

            tracing::info!(
                segment_index = segment.index,
                start_secs = timeline.total_duration(),
                duration_secs = audio.duration_seconds,
                "Segment added to timeline"
            );
            timeline.push_speech(segment.index, image, audio);
        }
        Ok(())
    }

    async fn render_caption(
        &self,
        text: &str,
        style: &Arc<CaptionStyle>,
    ) -> Result<RgbImage, VideoServiceError> {
        let renderer = self.renderer.clone();
        let style = style.clone();
        let text = text.to_string();
        tokio::task::spawn_blocking(move || renderer.render(&text, &style))
            .await
            .map_err(|e| anyhow::anyhow!("caption rendering failed: {}", e).into())
    }

    async fn render_promotional(
        &self,
        style: &Arc<CaptionStyle>,
    ) -> Result<RgbImage, VideoServiceError> {
        let logo = self.fetch_logo().await;
        let renderer = self.renderer.clone();
        let style = style.clone();
        let promo = self.settings.promo.clone();
        tokio::task::spawn_blocking(move || {
            renderer.render_promotional(&promo, &style, logo.as_ref())
        })
        .await
        .map_err(|e| anyhow::anyhow!("promotional rendering failed: {}", e).into())
    }

    async fn fetch_logo(&self) -> Option<RgbaImage> {
        if self.settings.logo_url.is_empty() {
            return None;
        }
        match self.logo_repo.fetch(&self.settings.logo_url).await {
            Ok(logo) => Some(logo),
            Err(e) => {
                tracing::warn!(
                    url = %self.settings.logo_url,
                    error = %e,
                    "Failed to fetch logo, rendering promotional frame without it"
                );
                None
            }
        }
    }
}

fn parse_color(value: Option<&str>, default: Color) -> Result<Color, VideoServiceError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|e: crate::domain::caption::ColorParseError| {
                VideoServiceError::Configuration(e.to_string())
            }),
        None => Ok(default),
    }
}

async fn load_background(path: &Path) -> Result<RgbImage, String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || image::open(&path).map(|img| img.to_rgb8()))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}
