use super::command::{check_ffmpeg, FfmpegCommand, FfmpegInput};
use super::error::{MediaError, MediaResult};
use crate::domain::caption::{FrameSize, VIDEO_FRAME};
use crate::domain::video::{Timeline, TimelineEntry};
use async_trait::async_trait;
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Fixed technical parameters of the produced file.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeSettings {
    pub fps: u32,
    pub video_codec: String,
    pub audio_codec: String,
    pub preset: String,
    pub threads: u32,
    pub pixel_format: String,
    pub frame: FrameSize,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            fps: 24,
            video_codec: "libx264".to_string(),
            audio_codec: "aac".to_string(),
            preset: "ultrafast".to_string(),
            threads: 4,
            pixel_format: "yuv420p".to_string(),
            frame: VIDEO_FRAME,
        }
    }
}

/// Multiplexes a finished timeline into one video file.
///
/// The timeline is consumed: its temporary audio is released when `encode`
/// returns, whatever the outcome. On failure nothing exists at `output`.
#[async_trait]
pub trait EncodingSink: Send + Sync {
    async fn encode(
        &self,
        timeline: Timeline,
        output: &Path,
        settings: &EncodeSettings,
    ) -> MediaResult<()>;

    /// Whether the backing encoder can run at all.
    fn is_available(&self) -> bool;
}

/// What ffmpeg needs to know about one timeline entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSource {
    pub frame: PathBuf,
    pub audio: Option<PathBuf>,
    pub duration_seconds: f64,
}

pub struct FfmpegEncoder {
    temp_dir: PathBuf,
}

impl FfmpegEncoder {
    pub fn new(temp_dir: PathBuf) -> Self {
        Self { temp_dir }
    }
}

#[async_trait]
impl EncodingSink for FfmpegEncoder {
    async fn encode(
        &self,
        timeline: Timeline,
        output: &Path,
        settings: &EncodeSettings,
    ) -> MediaResult<()> {
        if timeline.is_empty() {
            return Err(MediaError::EmptyTimeline);
        }
        check_ffmpeg()?;

        let total_duration = timeline.total_duration();
        let mut entries = timeline.into_entries();

        let scratch = tempfile::Builder::new()
            .prefix("frames-")
            .tempdir_in(&self.temp_dir)?;
        let frames = write_frames(scratch.path(), &mut entries).await?;

        let clips: Vec<ClipSource> = entries
            .iter()
            .zip(frames)
            .map(|(entry, frame)| clip_source(entry, frame))
            .collect();

        let partial = partial_path(output);
        let command = build_command(&clips, &partial, settings);

        info!(
            clips = clips.len(),
            duration_secs = total_duration,
            output = %output.display(),
            "Encoding video"
        );

        match command.run().await {
            Ok(()) => {
                tokio::fs::rename(&partial, output).await?;
                info!(output = %output.display(), "Video written");
                Ok(())
            }
            Err(e) => {
                if let MediaError::FfmpegFailed {
                    stderr, exit_code, ..
                } = &e
                {
                    error!(
                        exit_code = ?exit_code,
                        stderr = stderr.as_deref().unwrap_or(""),
                        output = %output.display(),
                        "FFmpeg encode failed"
                    );
                }
                if let Err(remove_err) = tokio::fs::remove_file(&partial).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            error = %remove_err,
                            path = %partial.display(),
                            "Failed to remove partial output"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    fn is_available(&self) -> bool {
        check_ffmpeg().is_ok()
    }
}

fn clip_source(entry: &TimelineEntry, frame: PathBuf) -> ClipSource {
    ClipSource {
        frame,
        audio: entry.audio.as_ref().map(|a| a.path().to_path_buf()),
        duration_seconds: entry.duration_seconds,
    }
}

/// `video.mp4` is staged as `video.mp4.partial`.
pub fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

/// Save every entry image as a PNG; the images are moved out of the entries.
async fn write_frames(dir: &Path, entries: &mut [TimelineEntry]) -> MediaResult<Vec<PathBuf>> {
    let images: Vec<RgbImage> = entries
        .iter_mut()
        .map(|e| std::mem::replace(&mut e.image, RgbImage::new(0, 0)))
        .collect();
    let dir = dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        images
            .into_iter()
            .enumerate()
            .map(|(i, image)| -> MediaResult<PathBuf> {
                let path = dir.join(format!("frame-{:04}.png", i));
                image.save_with_format(&path, ImageFormat::Png)?;
                Ok(path)
            })
            .collect::<MediaResult<Vec<_>>>()
    })
    .await
    .map_err(|e| MediaError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}

/// One ffmpeg run: a still+audio input pair per clip, joined with `concat`.
pub fn build_command(
    clips: &[ClipSource],
    output: &Path,
    settings: &EncodeSettings,
) -> FfmpegCommand {
    let mut command = FfmpegCommand::new(output);
    let mut filter = String::new();
    let mut concat_inputs = String::new();

    for (i, clip) in clips.iter().enumerate() {
        let video_index = command.input_count();
        command = command.input(
            FfmpegInput::file(&clip.frame)
                .looped_still(settings.fps)
                .duration(clip.duration_seconds),
        );

        let audio_index = command.input_count();
        let audio = match &clip.audio {
            Some(path) => FfmpegInput::file(path),
            None => FfmpegInput::lavfi("anullsrc=r=24000:cl=mono"),
        };
        command = command.input(audio.duration(clip.duration_seconds));

        filter.push_str(&format!(
            "[{}:v]scale={}:{},setsar=1[v{}];",
            video_index, settings.frame.width, settings.frame.height, i
        ));
        concat_inputs.push_str(&format!("[v{}][{}:a]", i, audio_index));
    }
    filter.push_str(&concat_inputs);
    filter.push_str(&format!("concat=n={}:v=1:a=1[outv][outa]", clips.len()));

    debug!(filter = %filter, "Built concat filter graph");

    command
        .filter_complex(filter)
        .map("[outv]")
        .map("[outa]")
        .video_codec(settings.video_codec.clone())
        .audio_codec(settings.audio_codec.clone())
        .preset(settings.preset.clone())
        .threads(settings.threads)
        .frame_rate(settings.fps)
        .pixel_format(settings.pixel_format.clone())
        .format("mp4")
}
