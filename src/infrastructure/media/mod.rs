//! Encoding sink backed by the ffmpeg binary.

pub mod command;
pub mod encoder;
pub mod error;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegInput};
pub use encoder::{EncodeSettings, EncodingSink, FfmpegEncoder};
pub use error::{MediaError, MediaResult};
