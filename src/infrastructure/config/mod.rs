use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GOOGLE_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com";
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
pub const DEFAULT_LOGO_URL: &str = "https://yt3.ggpht.com/pBI3iT87_fX91PGHS5gZtbQi53nuRBIvOsuc-Z-hXaE3GxyRQF8-vEIDYOzFz93dsKUEjoHEwQ=s176-c-k-c0x00ffffff-no-rj";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    // Google Text-to-Speech
    pub google_tts_api_key: String,
    pub google_tts_endpoint: String,
    // Rendering
    pub font_path: PathBuf,
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub logo_url: String,
    pub segment_delay: Duration,
    pub max_segment_chars: usize,
    pub max_segment_words: usize,
    pub ffmpeg_threads: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; unset keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let google_tts_api_key = lookup("GOOGLE_TTS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or("GOOGLE_TTS_API_KEY must be set")?;

        let max_segment_chars: usize = var("MAX_SEGMENT_CHARS", "300").parse()?;
        let max_segment_words: usize = var("MAX_SEGMENT_WORDS", "30").parse()?;
        if max_segment_chars == 0 || max_segment_words == 0 {
            return Err("MAX_SEGMENT_CHARS and MAX_SEGMENT_WORDS must be positive".into());
        }

        let config = Config {
            host: var("HOST", "0.0.0.0"),
            port: var("PORT", "8080").parse()?,
            log_format: match var("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            google_tts_api_key,
            google_tts_endpoint: var("GOOGLE_TTS_ENDPOINT", DEFAULT_GOOGLE_TTS_ENDPOINT),
            font_path: PathBuf::from(var("FONT_PATH", DEFAULT_FONT_PATH)),
            output_dir: PathBuf::from(var("OUTPUT_DIR", "output")),
            temp_dir: lookup("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            logo_url: var("LOGO_URL", DEFAULT_LOGO_URL),
            segment_delay: Duration::from_millis(var("SEGMENT_DELAY_MS", "200").parse()?),
            max_segment_chars,
            max_segment_words,
            ffmpeg_threads: var("FFMPEG_THREADS", "4").parse()?,
        };

        Ok(config)
    }
}
