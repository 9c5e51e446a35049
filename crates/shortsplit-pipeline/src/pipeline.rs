//! The segmentation run.

use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use shortsplit_media::{EncodeRequest, FrameRequest, Transcoder};
use shortsplit_models::{
    plan_segments, CropMode, EncodingConfig, SegmentRecord, SourceVideo, VideoStatus,
};

use crate::config::{FailurePolicy, PipelineConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::progress::ProgressSink;
use crate::report::{RunReport, SegmentFailure};

/// Orchestrates one run: probe -> plan -> encode xN -> thumbnail per
/// segment, strictly sequential so a single run never stacks transcodes.
pub struct SegmentationPipeline {
    transcoder: Arc<dyn Transcoder>,
    sink: Arc<dyn ProgressSink>,
    config: PipelineConfig,
    encoding: EncodingConfig,
}

impl SegmentationPipeline {
    pub fn new(
        transcoder: Arc<dyn Transcoder>,
        sink: Arc<dyn ProgressSink>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            transcoder,
            sink,
            config,
            encoding: EncodingConfig::default(),
        }
    }

    /// Override the encoder settings for this pipeline.
    pub fn with_encoding(mut self, encoding: EncodingConfig) -> Self {
        self.encoding = encoding;
        self
    }

    /// Process a source video to completion.
    ///
    /// Always returns a report: fatal errors (missing tools, unreadable
    /// metadata, too-short source) are logged, turned into a terminal
    /// `Failed` status with a user-facing message, and never escape as
    /// `Err` or a panic. Segments created before a mid-run fatal error are
    /// kept in the report.
    pub async fn run(&self, mut video: SourceVideo, crop_mode: CropMode) -> RunReport {
        let mut segments = Vec::new();
        let mut failures = Vec::new();
        let mut planned = 0u32;

        let result = self
            .execute(&mut video, crop_mode, &mut segments, &mut failures, &mut planned)
            .await;

        match result {
            Ok(()) => self.finalize(&mut video, &segments, &failures, planned).await,
            Err(err) => {
                error!(video_id = %video.id, error = %err, "segmentation run failed");
                video.fail(err.user_message());
                self.sink.set_status(&video.id, VideoStatus::Failed).await;
                self.sink
                    .set_progress(&video.id, video.progress, &video.message)
                    .await;
            }
        }

        RunReport {
            video,
            segments,
            failures,
            planned,
        }
    }

    async fn execute(
        &self,
        video: &mut SourceVideo,
        crop_mode: CropMode,
        segments: &mut Vec<SegmentRecord>,
        failures: &mut Vec<SegmentFailure>,
        planned: &mut u32,
    ) -> PipelineResult<()> {
        // Detect missing tools before touching the record
        self.transcoder
            .ensure_available()
            .map_err(|e| PipelineError::ToolUnavailable(e.to_string()))?;

        video.begin_processing();
        self.sink.set_status(&video.id, VideoStatus::Processing).await;
        self.sink.set_progress(&video.id, 0, &video.message).await;

        let duration = match video.duration {
            Some(d) => d,
            None => {
                self.progress(video, 0, "Analyzing video...".to_string()).await;
                let probe = self
                    .transcoder
                    .probe(&video.source_path)
                    .await
                    .map_err(PipelineError::Probe)?;
                video.apply_probe(&probe);
                probe.duration
            }
        };

        let plan = plan_segments(duration, video.target_duration, video.max_segments)
            .map_err(PipelineError::Plan)?;
        *planned = plan.len() as u32;

        video.segments_total = *planned;
        self.sink.set_planned_total(&video.id, *planned).await;
        self.progress(video, 0, format!("Creating {} shorts...", planned))
            .await;

        let shorts_dir = self.output_dir(video, "shorts");
        let thumbs_dir = self.output_dir(video, "thumbnails");
        tokio::fs::create_dir_all(&shorts_dir).await?;
        tokio::fs::create_dir_all(&thumbs_dir).await?;

        for seg in &plan.segments {
            let percent = ((seg.index - 1) * 100 / *planned) as u8;
            self.progress(
                video,
                percent,
                format!("Creating short {}/{}...", seg.index, planned),
            )
            .await;

            let output = shorts_dir.join(format!("short_{}.mp4", seg.index));
            let request = EncodeRequest::new(&video.source_path, &output, seg.start, seg.duration)
                .with_crop_mode(crop_mode)
                .with_encoding(self.encoding.clone())
                .with_timeout(self.config.segment_timeout);

            match self.transcoder.encode_segment(&request).await {
                Ok(()) => {
                    let mut record = SegmentRecord::new(
                        video.id.clone(),
                        seg.index,
                        &video.title,
                        seg.start,
                        seg.duration as u32,
                        &output,
                    );

                    let thumb = thumbs_dir.join(format!("thumb_{}.jpg", seg.index));
                    let frame = FrameRequest::for_segment(&video.source_path, &thumb, seg.start);
                    match self.transcoder.extract_frame(&frame).await {
                        Ok(()) => record.set_thumbnail(&thumb),
                        // A segment without a thumbnail is degraded but valid
                        Err(e) => warn!(
                            video_id = %video.id,
                            index = seg.index,
                            error = %e,
                            "thumbnail extraction failed"
                        ),
                    }

                    segments.push(record);
                    video.segments_created = segments.len() as u32;
                    self.sink.increment_created(&video.id).await;
                    info!(
                        video_id = %video.id,
                        index = seg.index,
                        total = *planned,
                        "created segment"
                    );
                }
                Err(err) if err.is_tool_unavailable() => {
                    return Err(PipelineError::ToolUnavailable(err.to_string()));
                }
                Err(err) => {
                    error!(
                        video_id = %video.id,
                        index = seg.index,
                        error = %err,
                        "segment encode failed"
                    );
                    failures.push(SegmentFailure {
                        index: seg.index,
                        reason: err.to_string(),
                    });
                    if self.config.failure_policy == FailurePolicy::Abort {
                        warn!(video_id = %video.id, "aborting run after failed segment");
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    async fn finalize(
        &self,
        video: &mut SourceVideo,
        segments: &[SegmentRecord],
        failures: &[SegmentFailure],
        planned: u32,
    ) {
        let created = segments.len() as u32;
        let attempted = created + failures.len() as u32;

        if created == 0 {
            video.fail(format!("All {} planned segments failed to encode.", planned));
            self.sink.set_status(&video.id, VideoStatus::Failed).await;
            self.sink
                .set_progress(&video.id, video.progress, &video.message)
                .await;
            return;
        }

        let message = if failures.is_empty() {
            format!("Done! Created {} shorts.", created)
        } else if attempted < planned {
            format!(
                "Stopped after a failed segment: created {} of {} shorts.",
                created, planned
            )
        } else {
            format!(
                "Done with errors: created {} of {} shorts ({} failed).",
                created,
                planned,
                failures.len()
            )
        };

        video.complete(message.clone());
        self.sink.set_status(&video.id, VideoStatus::Completed).await;
        self.sink.set_progress(&video.id, 100, &message).await;
    }

    async fn progress(&self, video: &mut SourceVideo, percent: u8, message: String) {
        video.set_progress(percent, message.clone());
        self.sink.set_progress(&video.id, percent, &message).await;
    }

    fn output_dir(&self, video: &SourceVideo, kind: &str) -> PathBuf {
        self.config.media_root.join(kind).join(video.id.as_str())
    }
}

// Keep the planner's error text aligned with what users see on failed runs.
#[cfg(test)]
mod tests {
    use super::*;
    use shortsplit_models::PlanError;

    #[test]
    fn insufficient_duration_message_names_the_cause() {
        let err = PipelineError::Plan(PlanError::InsufficientDuration {
            duration: 10.0,
            target: 60,
        });
        let msg = err.user_message();
        assert!(msg.contains("too short"), "got: {}", msg);
    }
}
