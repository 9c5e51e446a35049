//! The [`Transcoder`] seam.
//!
//! Pipeline logic talks to the external tools only through this trait, so
//! it can be exercised with a fake implementation that never spawns a
//! process.

use async_trait::async_trait;
use std::path::Path;

use shortsplit_models::SourceProbe;

use crate::command::{check_ffmpeg, check_ffprobe};
use crate::encode::{encode_segment, EncodeRequest};
use crate::error::MediaResult;
use crate::probe::probe_source;
use crate::thumbnail::{extract_frame, FrameRequest};

/// Narrow interface over the external encoder and prober.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Verify the backing tools exist before a run starts.
    fn ensure_available(&self) -> MediaResult<()>;

    /// Read-only metadata extraction.
    async fn probe(&self, path: &Path) -> MediaResult<SourceProbe>;

    /// Encode one segment; Ok means the output file exists.
    async fn encode_segment(&self, request: &EncodeRequest) -> MediaResult<()>;

    /// Extract one frame; Ok means the image file exists.
    async fn extract_frame(&self, request: &FrameRequest) -> MediaResult<()>;
}

/// The real implementation, backed by the ffmpeg/ffprobe binaries.
#[derive(Debug, Default, Clone)]
pub struct FfmpegTranscoder;

impl FfmpegTranscoder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn ensure_available(&self) -> MediaResult<()> {
        check_ffmpeg()?;
        check_ffprobe()?;
        Ok(())
    }

    async fn probe(&self, path: &Path) -> MediaResult<SourceProbe> {
        probe_source(path).await
    }

    async fn encode_segment(&self, request: &EncodeRequest) -> MediaResult<()> {
        encode_segment(request).await
    }

    async fn extract_frame(&self, request: &FrameRequest) -> MediaResult<()> {
        extract_frame(request).await
    }
}
