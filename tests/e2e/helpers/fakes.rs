use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use textreel_backend::domain::tts::Voice;
use textreel_backend::domain::video::{EntryKind, Timeline};
use textreel_backend::infrastructure::media::{
    EncodeSettings, EncodingSink, MediaError, MediaResult,
};
use textreel_backend::infrastructure::repositories::{
    LogoRepository, TtsProviderError, TtsRepository,
};

/// Mono 16-bit WAV of `seconds` of silence at 8 kHz.
pub fn wav_bytes(seconds: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..(seconds * 8000.0).round() as usize {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[derive(Debug, Clone)]
pub enum TtsBehavior {
    /// Every call returns this much audio.
    Speak(f64),
    /// Every call is rate limited.
    RateLimited,
    /// Every call fails for good.
    Broken,
}

pub struct FakeTtsRepository {
    behavior: Mutex<TtsBehavior>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeTtsRepository {
    pub fn new(behavior: TtsBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_behavior(&self, behavior: TtsBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// (text, voice id) of every request, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TtsRepository for FakeTtsRepository {
    async fn synthesize(&self, text: &str, voice: &Voice) -> Result<Vec<u8>, TtsProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), voice.id.to_string()));
        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            TtsBehavior::Speak(seconds) => Ok(wav_bytes(seconds)),
            TtsBehavior::RateLimited => Err(TtsProviderError::RateLimited("429".to_string())),
            TtsBehavior::Broken => Err(TtsProviderError::Failed("403 forbidden".to_string())),
        }
    }
}

pub struct FakeLogoRepository;

#[async_trait]
impl LogoRepository for FakeLogoRepository {
    async fn fetch(&self, _url: &str) -> Result<RgbaImage, String> {
        Ok(RgbaImage::from_pixel(16, 16, Rgba([200, 0, 0, 255])))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodedClip {
    pub kind: EntryKind,
    pub start: f64,
    pub duration: f64,
    pub has_audio: bool,
}

/// Writes a placeholder file instead of running ffmpeg.
#[derive(Default)]
pub struct FakeEncoder {
    fail: Mutex<bool>,
    runs: Mutex<Vec<(PathBuf, Vec<EncodedClip>)>>,
}

impl FakeEncoder {
    pub fn fail_next(&self) {
        *self.fail.lock().unwrap() = true;
    }

    pub fn runs(&self) -> Vec<(PathBuf, Vec<EncodedClip>)> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl EncodingSink for FakeEncoder {
    async fn encode(
        &self,
        timeline: Timeline,
        output: &Path,
        _settings: &EncodeSettings,
    ) -> MediaResult<()> {
        let clips = timeline
            .entries()
            .iter()
            .map(|e| EncodedClip {
                kind: e.kind,
                start: e.start_offset_seconds,
                duration: e.duration_seconds,
                has_audio: e.audio.is_some(),
            })
            .collect();
        self.runs.lock().unwrap().push((output.to_path_buf(), clips));

        if std::mem::take(&mut *self.fail.lock().unwrap()) {
            return Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                Some("Invalid data found when processing input".to_string()),
                Some(1),
            ));
        }

        tokio::fs::write(output, b"fake mp4").await?;
        Ok(())
    }

    fn is_available(&self) -> bool {
        true
    }
}
