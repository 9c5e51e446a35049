//! Segment encoding.

use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use shortsplit_models::{CropMode, EncodingConfig};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::portrait_filter;

/// Everything needed to encode one segment.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    /// Source video file
    pub input: PathBuf,
    /// Target output file
    pub output: PathBuf,
    /// Start offset in the source, seconds
    pub start_time: f64,
    /// Seconds to read from the start offset
    pub duration: f64,
    /// Horizontal crop strategy
    pub crop_mode: CropMode,
    /// Encoder settings
    pub encoding: EncodingConfig,
    /// Kill the encoder after this long, if set
    pub timeout: Option<Duration>,
}

impl EncodeRequest {
    pub fn new(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        start_time: f64,
        duration: f64,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            start_time,
            duration,
            crop_mode: CropMode::default(),
            encoding: EncodingConfig::default(),
            timeout: None,
        }
    }

    pub fn with_crop_mode(mut self, mode: CropMode) -> Self {
        self.crop_mode = mode;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingConfig) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Encode one vertical segment from the source.
///
/// Seeks to the start offset, reads the window, applies the 9:16 crop and
/// portrait scale, and encodes per the request's settings. Success is
/// judged by the output file existing after the process exits, not by the
/// exit code alone: encoders that warn on stderr but still write valid
/// output are accepted (the warning is logged).
pub async fn encode_segment(request: &EncodeRequest) -> MediaResult<()> {
    info!(
        input = %request.input.display(),
        output = %request.output.display(),
        start = request.start_time,
        duration = request.duration,
        crop = %request.crop_mode,
        "encoding segment"
    );

    let cmd = FfmpegCommand::new(&request.input, &request.output)
        .seek(request.start_time)
        .read_duration(request.duration)
        .video_filter(portrait_filter(request.crop_mode))
        .output_args(request.encoding.to_ffmpeg_args());

    let mut runner = FfmpegRunner::new();
    if let Some(timeout) = request.timeout {
        runner = runner.with_timeout(timeout);
    }

    let output = runner.run(&cmd).await?;

    if output_exists(&request.output) {
        if !output.success {
            warn!(
                exit_code = ?output.exit_code,
                stderr = %output.stderr.trim(),
                "encoder exited non-zero but produced output, accepting"
            );
        }
        Ok(())
    } else {
        Err(MediaError::encode_failed(
            format!("no file at {}", request.output.display()),
            Some(output.stderr),
            output.exit_code,
        ))
    }
}

fn output_exists(path: &Path) -> bool {
    path.exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builds_expected_command() {
        let request = EncodeRequest::new("/in/talk.mp4", "/out/short_1.mp4", 60.0, 60.0)
            .with_crop_mode(CropMode::Center);

        let cmd = FfmpegCommand::new(&request.input, &request.output)
            .seek(request.start_time)
            .read_duration(request.duration)
            .video_filter(portrait_filter(request.crop_mode))
            .output_args(request.encoding.to_ffmpeg_args());
        let args = cmd.build_args();

        assert!(args.contains(&"-vf".to_string()));
        assert!(args.iter().any(|a| a.contains("crop=ih*9/16")));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"+faststart".to_string()));
        assert_eq!(args.last().unwrap(), "/out/short_1.mp4");
    }
}
