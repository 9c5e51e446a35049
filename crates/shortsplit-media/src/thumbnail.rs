//! Thumbnail frame extraction.

use std::path::PathBuf;
use tracing::debug;

use shortsplit_models::encoding::THUMBNAIL_OFFSET_SECS;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::thumbnail_filter;

/// Parameters for a single-frame extraction.
#[derive(Debug, Clone)]
pub struct FrameRequest {
    /// Source video file
    pub input: PathBuf,
    /// Target image file
    pub output: PathBuf,
    /// Frame position in the source, seconds
    pub at_seconds: f64,
}

impl FrameRequest {
    /// Frame for a segment: a small fixed offset past the segment start so
    /// the thumbnail skips any fade-in on the cut boundary.
    pub fn for_segment(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        segment_start: f64,
    ) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            at_seconds: segment_start + THUMBNAIL_OFFSET_SECS,
        }
    }
}

/// Extract one frame, scaled to portrait height.
pub async fn extract_frame(request: &FrameRequest) -> MediaResult<()> {
    debug!(
        input = %request.input.display(),
        output = %request.output.display(),
        at = request.at_seconds,
        "extracting thumbnail frame"
    );

    let cmd = FfmpegCommand::new(&request.input, &request.output)
        .seek(request.at_seconds)
        .single_frame()
        .video_filter(thumbnail_filter());

    let output = FfmpegRunner::new().run(&cmd).await?;

    if request.output.exists() {
        Ok(())
    } else {
        Err(MediaError::FrameExtractionFailed {
            message: format!("no file at {}", request.output.display()),
            stderr: Some(output.stderr),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_frame_is_offset_past_the_cut() {
        let request = FrameRequest::for_segment("/in.mp4", "/thumb.jpg", 120.0);
        assert!((request.at_seconds - 121.0).abs() < 1e-9);
    }
}
