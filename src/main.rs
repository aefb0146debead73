use std::sync::Arc;
use textreel_backend::controllers::video::VideoController;
use textreel_backend::domain::caption::{CaptionFont, CaptionRenderer, PromoContent, VIDEO_FRAME};
use textreel_backend::domain::tts::{RetryPolicy, SpeechSynthesizer};
use textreel_backend::domain::video::{VideoService, VideoServiceApi, VideoServiceSettings};
use textreel_backend::infrastructure::config::{Config, LogFormat};
use textreel_backend::infrastructure::http::{build_router, start_http_server};
use textreel_backend::infrastructure::media::{EncodeSettings, FfmpegEncoder};
use textreel_backend::infrastructure::repositories::{GoogleTtsRepository, HttpLogoRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting TextReel Backend on {}:{}",
        config.host,
        config.port
    );

    let encoder = Arc::new(FfmpegEncoder::new(config.temp_dir.clone()));
    match textreel_backend::infrastructure::media::check_ffmpeg() {
        Ok(path) => tracing::info!(ffmpeg = %path.display(), "FFmpeg found"),
        Err(_) => {
            tracing::warn!("FFmpeg not found in PATH, renders will fail until it is installed")
        }
    }

    let font = CaptionFont::load_or_fallback(&config.font_path)?;
    let renderer = Arc::new(CaptionRenderer::new(font, VIDEO_FRAME));

    let config = Arc::new(config);
    let http_client = reqwest::Client::new();

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories
    tracing::info!("Instantiating repositories...");
    let tts_repo = Arc::new(GoogleTtsRepository::new(
        http_client.clone(),
        config.google_tts_endpoint.clone(),
        config.google_tts_api_key.clone(),
    ));
    let logo_repo = Arc::new(HttpLogoRepository::new(http_client));

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let synthesizer =
        SpeechSynthesizer::new(tts_repo, RetryPolicy::default(), config.temp_dir.clone());
    let video_service: Arc<dyn VideoServiceApi> = Arc::new(VideoService::new(
        synthesizer,
        renderer,
        logo_repo,
        encoder,
        VideoServiceSettings {
            output_dir: config.output_dir.clone(),
            logo_url: config.logo_url.clone(),
            segment_delay: config.segment_delay,
            max_segment_chars: config.max_segment_chars,
            max_segment_words: config.max_segment_words,
            encode: EncodeSettings {
                threads: config.ffmpeg_threads,
                ..EncodeSettings::default()
            },
            promo: PromoContent::default(),
        },
    ));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let video_controller = Arc::new(VideoController::new(video_service.clone()));

    // Start HTTP server with all routes
    let router = build_router(video_service, video_controller);
    start_http_server(config, router).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "textreel_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "textreel_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
