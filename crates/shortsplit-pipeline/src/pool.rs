//! Bounded run pool.
//!
//! Replaces fire-and-forget background threads: runs are spawned onto the
//! tokio runtime behind a semaphore so at most `max_concurrent_runs`
//! transcodes happen at once, and every run stays observable through the
//! shared status store and its join handle.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::info;

use shortsplit_models::{CropMode, SourceVideo};

use crate::pipeline::SegmentationPipeline;
use crate::report::RunReport;

/// Bounded-concurrency executor for segmentation runs.
pub struct RunPool {
    pipeline: Arc<SegmentationPipeline>,
    permits: Arc<Semaphore>,
}

impl RunPool {
    pub fn new(pipeline: Arc<SegmentationPipeline>, max_concurrent_runs: usize) -> Self {
        Self {
            pipeline,
            permits: Arc::new(Semaphore::new(max_concurrent_runs.max(1))),
        }
    }

    /// Queue a run. The returned handle resolves to the run report; the
    /// run itself starts once a permit is free.
    pub fn spawn(&self, video: SourceVideo, crop_mode: CropMode) -> JoinHandle<RunReport> {
        let pipeline = Arc::clone(&self.pipeline);
        let permits = Arc::clone(&self.permits);
        let video_id = video.id.clone();

        tokio::spawn(async move {
            // The semaphore is never closed, so acquire only fails if the
            // pool itself was dropped mid-shutdown.
            let _permit = permits
                .acquire_owned()
                .await
                .expect("run pool semaphore closed");
            info!(video_id = %video_id, "run permit acquired");
            pipeline.run(video, crop_mode).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::progress::NoopSink;
    use async_trait::async_trait;
    use shortsplit_media::{EncodeRequest, FrameRequest, MediaError, MediaResult, Transcoder};
    use shortsplit_models::SourceProbe;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts how many encodes are in flight at once.
    struct GaugeTranscoder {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl Transcoder for GaugeTranscoder {
        fn ensure_available(&self) -> MediaResult<()> {
            Ok(())
        }

        async fn probe(&self, _path: &Path) -> MediaResult<SourceProbe> {
            Ok(SourceProbe {
                duration: 120.0,
                width: 1920,
                height: 1080,
                file_size: 1,
            })
        }

        async fn encode_segment(&self, _request: &EncodeRequest) -> MediaResult<()> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }

        async fn extract_frame(&self, _request: &FrameRequest) -> MediaResult<()> {
            Err(MediaError::FrameExtractionFailed {
                message: "no frames in tests".into(),
                stderr: None,
            })
        }
    }

    #[tokio::test]
    async fn pool_bounds_concurrent_runs() {
        let transcoder = Arc::new(GaugeTranscoder {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let dir = tempfile::tempdir().unwrap();
        let pipeline = Arc::new(SegmentationPipeline::new(
            transcoder.clone(),
            Arc::new(NoopSink),
            PipelineConfig::default().with_media_root(dir.path()),
        ));

        let pool = RunPool::new(pipeline, 1);
        let handles: Vec<_> = (0..3)
            .map(|i| {
                let video = SourceVideo::new(format!("v{}", i), "/in.mp4");
                pool.spawn(video, CropMode::Center)
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        // With a single permit, encodes never overlap across runs
        assert_eq!(transcoder.peak.load(Ordering::SeqCst), 1);
    }
}
