use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use textreel_backend::controllers::video::VideoController;
use textreel_backend::domain::caption::{CaptionFont, CaptionRenderer, FrameSize, PromoContent};
use textreel_backend::domain::tts::{RetryPolicy, SpeechSynthesizer};
use textreel_backend::domain::video::{VideoService, VideoServiceApi, VideoServiceSettings};
use textreel_backend::infrastructure::http::build_router;
use textreel_backend::infrastructure::media::EncodeSettings;
use tokio::net::TcpListener;

pub mod fakes;

use api_client::TestClient;
use fakes::{FakeEncoder, FakeLogoRepository, FakeTtsRepository, TtsBehavior};

/// Seconds of audio the fake speech service returns per segment by default.
pub const SEGMENT_SECONDS: f64 = 2.0;

/// Small frame so rendering stays fast; layout does not depend on size.
const TEST_FRAME: FrameSize = FrameSize {
    width: 108,
    height: 192,
};

pub struct TestContext {
    pub client: TestClient,
    pub tts: Arc<FakeTtsRepository>,
    pub encoder: Arc<FakeEncoder>,
    pub output_dir: PathBuf,
    pub audio_dir: PathBuf,
    _scratch: TempDir,
}

impl TestContext {
    /// Files left behind in the transient audio directory.
    pub fn leftover_audio(&self) -> usize {
        std::fs::read_dir(&self.audio_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let scratch = tempfile::tempdir().expect("Failed to create scratch dir");
            let output_dir = scratch.path().join("output");
            let audio_dir = scratch.path().join("audio");
            std::fs::create_dir_all(&audio_dir).expect("Failed to create audio dir");

            let tts = Arc::new(FakeTtsRepository::new(TtsBehavior::Speak(SEGMENT_SECONDS)));
            let encoder = Arc::new(FakeEncoder::default());

            // Millisecond backoff keeps retry exhaustion fast without changing the schedule shape
            let retry = RetryPolicy {
                max_retries: 3,
                base_delay: Duration::from_millis(1),
            };
            let synthesizer = SpeechSynthesizer::new(tts.clone(), retry, audio_dir.clone());

            let video_service: Arc<dyn VideoServiceApi> = Arc::new(VideoService::new(
                synthesizer,
                Arc::new(CaptionRenderer::new(
                    CaptionFont::bundled().expect("Failed to load bundled font"),
                    TEST_FRAME,
                )),
                Arc::new(FakeLogoRepository),
                encoder.clone(),
                VideoServiceSettings {
                    output_dir: output_dir.clone(),
                    logo_url: "http://logo.test/logo.png".to_string(),
                    segment_delay: Duration::ZERO,
                    max_segment_chars: 300,
                    max_segment_words: 30,
                    encode: EncodeSettings::default(),
                    promo: PromoContent {
                        title_font_size: 8,
                        ..PromoContent::default()
                    },
                },
            ));
            let video_controller = Arc::new(VideoController::new(video_service.clone()));
            let app = build_router(video_service, video_controller);

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self {
                client: TestClient::new(&base_url),
                tts,
                encoder,
                output_dir,
                audio_dir,
                _scratch: scratch,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Scratch directory is removed when the TempDir drops
        }
    }
}
