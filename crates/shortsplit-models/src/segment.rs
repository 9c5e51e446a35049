//! Segment ("Short") records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::video::VideoId;

/// One vertical-cropped output clip derived from a source video.
///
/// Records are created one by one as the pipeline succeeds; a segment that
/// fails encoding never gets a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    /// Parent source video
    pub video_id: VideoId,

    /// 1-based position within the run
    pub index: u32,

    /// Display title, derived from the source title
    pub title: String,

    /// Start offset in the source, in seconds
    pub start_time: f64,

    /// Length in whole seconds, at most the target duration
    pub duration: u32,

    /// Encoded output file
    pub output_path: PathBuf,

    /// Extracted thumbnail, if frame extraction succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_path: Option<PathBuf>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl SegmentRecord {
    /// Create a record for a freshly encoded segment.
    pub fn new(
        video_id: VideoId,
        index: u32,
        video_title: &str,
        start_time: f64,
        duration: u32,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            video_id,
            index,
            title: format!("{} - Part {}", video_title, index),
            start_time,
            duration,
            output_path: output_path.into(),
            thumbnail_path: None,
            created_at: Utc::now(),
        }
    }

    /// Attach a thumbnail after frame extraction.
    pub fn set_thumbnail(&mut self, path: impl Into<PathBuf>) {
        self.thumbnail_path = Some(path.into());
    }
}
