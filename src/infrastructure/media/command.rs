//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use super::error::{MediaError, MediaResult};

/// One `-i` source with the options that must precede it.
#[derive(Debug, Clone, PartialEq)]
pub struct FfmpegInput {
    args: Vec<String>,
    source: String,
}

impl FfmpegInput {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self {
            args: Vec::new(),
            source: path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// A lavfi source such as `anullsrc=r=24000:cl=mono`.
    pub fn lavfi(graph: impl Into<String>) -> Self {
        Self {
            args: vec!["-f".to_string(), "lavfi".to_string()],
            source: graph.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Loop a still image at `fps` (`-loop 1 -framerate fps`).
    pub fn looped_still(self, fps: u32) -> Self {
        self.arg("-loop")
            .arg("1")
            .arg("-framerate")
            .arg(fps.to_string())
    }

    /// Limit the input to `seconds` (`-t`).
    pub fn duration(self, seconds: f64) -> Self {
        self.arg("-t").arg(format!("{:.3}", seconds))
    }
}

/// Builder for a multi-input FFmpeg command.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    inputs: Vec<FfmpegInput>,
    output: PathBuf,
    output_args: Vec<String>,
    overwrite: bool,
}

impl FfmpegCommand {
    pub fn new(output: impl AsRef<Path>) -> Self {
        Self {
            inputs: Vec::new(),
            output: output.as_ref().to_path_buf(),
            output_args: Vec::new(),
            overwrite: true,
        }
    }

    pub fn input(mut self, input: FfmpegInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    pub fn filter_complex(self, filter: impl Into<String>) -> Self {
        self.output_arg("-filter_complex").output_arg(filter)
    }

    pub fn map(self, label: impl Into<String>) -> Self {
        self.output_arg("-map").output_arg(label)
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:v").output_arg(codec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_arg("-c:a").output_arg(codec)
    }

    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_arg("-preset").output_arg(preset)
    }

    pub fn threads(self, threads: u32) -> Self {
        self.output_arg("-threads").output_arg(threads.to_string())
    }

    pub fn frame_rate(self, fps: u32) -> Self {
        self.output_arg("-r").output_arg(fps.to_string())
    }

    pub fn pixel_format(self, format: impl Into<String>) -> Self {
        self.output_arg("-pix_fmt").output_arg(format)
    }

    /// Force the container when the output extension doesn't say it.
    pub fn format(self, format: impl Into<String>) -> Self {
        self.output_arg("-f").output_arg(format)
    }

    pub fn build_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.overwrite {
            args.push("-y".to_string());
        }

        // Only errors reach stderr, which becomes the failure message
        args.push("-v".to_string());
        args.push("error".to_string());

        for input in &self.inputs {
            args.extend(input.args.iter().cloned());
            args.push("-i".to_string());
            args.push(input.source.clone());
        }

        args.extend(self.output_args.iter().cloned());
        args.push(self.output.to_string_lossy().to_string());

        args
    }

    /// Run to completion, capturing stderr for the error.
    pub async fn run(&self) -> MediaResult<()> {
        let ffmpeg = check_ffmpeg()?;
        let args = self.build_args();
        debug!(inputs = self.inputs.len(), "Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = Command::new(ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with non-zero status",
                (!stderr.is_empty()).then_some(stderr),
                output.status.code(),
            ))
        }
    }
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}
