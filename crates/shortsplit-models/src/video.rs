//! Source video record and processing status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// Unique identifier for a source video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for VideoId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Processing status of a source video.
///
/// Transitions: `Uploaded -> Processing -> {Completed | Failed}`.
/// Terminal states never transition back; a new run requires a new record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    /// Uploaded, not yet processed
    #[default]
    Uploaded,
    /// Segmentation pipeline is running
    Processing,
    /// All planned segments were attempted and at least one was created
    Completed,
    /// Run aborted or produced nothing
    Failed,
}

impl VideoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Uploaded => "uploaded",
            VideoStatus::Processing => "processing",
            VideoStatus::Completed => "completed",
            VideoStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, VideoStatus::Completed | VideoStatus::Failed)
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Metadata probed from a source file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceProbe {
    /// Duration in seconds
    pub duration: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// File size in bytes
    pub file_size: u64,
}

/// A source video owned by the surrounding application.
///
/// The pipeline mutates the status/progress fields while it runs but does
/// not own the record's lifecycle: it is created before the run and
/// persists after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceVideo {
    /// Unique video ID
    pub id: VideoId,

    /// Display title; segment titles are derived from it
    pub title: String,

    /// Path to the uploaded source file
    pub source_path: PathBuf,

    /// Duration in seconds, if already probed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Source width in pixels, if already probed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Source height in pixels, if already probed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,

    /// File size in bytes, if already probed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,

    /// Desired length of each segment in seconds (15-180)
    pub target_duration: u32,

    /// Upper bound on the number of segments to produce (1-50)
    pub max_segments: u32,

    /// Processing status
    #[serde(default)]
    pub status: VideoStatus,

    /// Progress percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    /// Human-readable status message shown by polling UIs
    #[serde(default)]
    pub message: String,

    /// Total number of segments the planner decided on
    #[serde(default)]
    pub segments_total: u32,

    /// Number of segments created so far
    #[serde(default)]
    pub segments_created: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Default target segment length in seconds.
pub const DEFAULT_TARGET_DURATION: u32 = 60;
/// Default segment count cap.
pub const DEFAULT_MAX_SEGMENTS: u32 = 10;

impl SourceVideo {
    /// Create a fresh record for an uploaded file.
    pub fn new(title: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        let now = Utc::now();
        Self {
            id: VideoId::new(),
            title: title.into(),
            source_path: source_path.into(),
            duration: None,
            width: None,
            height: None,
            file_size: None,
            target_duration: DEFAULT_TARGET_DURATION,
            max_segments: DEFAULT_MAX_SEGMENTS,
            status: VideoStatus::Uploaded,
            progress: 0,
            message: String::new(),
            segments_total: 0,
            segments_created: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Override the target segment length.
    pub fn with_target_duration(mut self, seconds: u32) -> Self {
        self.target_duration = seconds;
        self
    }

    /// Override the segment count cap.
    pub fn with_max_segments(mut self, count: u32) -> Self {
        self.max_segments = count;
        self
    }

    /// Store probed metadata on the record.
    pub fn apply_probe(&mut self, probe: &SourceProbe) {
        self.duration = Some(probe.duration);
        self.width = Some(probe.width);
        self.height = Some(probe.height);
        self.file_size = Some(probe.file_size);
        self.updated_at = Utc::now();
    }

    /// Transition into `Processing` and reset run counters.
    pub fn begin_processing(&mut self) {
        self.status = VideoStatus::Processing;
        self.progress = 0;
        self.segments_created = 0;
        self.message = "Starting processing...".to_string();
        self.updated_at = Utc::now();
    }

    /// Update progress and the status message.
    pub fn set_progress(&mut self, percent: u8, message: impl Into<String>) {
        self.progress = percent.min(100);
        self.message = message.into();
        self.updated_at = Utc::now();
    }

    /// Mark the run as completed.
    pub fn complete(&mut self, message: impl Into<String>) {
        self.status = VideoStatus::Completed;
        self.progress = 100;
        self.message = message.into();
        self.updated_at = Utc::now();
    }

    /// Mark the run as failed with a user-facing cause.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = VideoStatus::Failed;
        self.message = message.into();
        self.updated_at = Utc::now();
    }

    /// Source resolution as "WxH", if probed.
    pub fn resolution(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{}x{}", w, h)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_starts_uploaded() {
        let video = SourceVideo::new("Talk", "/uploads/talk.mp4");
        assert_eq!(video.status, VideoStatus::Uploaded);
        assert_eq!(video.target_duration, 60);
        assert_eq!(video.max_segments, 10);
        assert!(video.duration.is_none());
    }

    #[test]
    fn status_transitions() {
        let mut video = SourceVideo::new("Talk", "/uploads/talk.mp4");
        video.begin_processing();
        assert_eq!(video.status, VideoStatus::Processing);
        assert!(!video.status.is_terminal());

        video.complete("Done");
        assert_eq!(video.status, VideoStatus::Completed);
        assert_eq!(video.progress, 100);
        assert!(video.status.is_terminal());
    }

    #[test]
    fn fail_preserves_progress_but_sets_message() {
        let mut video = SourceVideo::new("Talk", "/uploads/talk.mp4");
        video.begin_processing();
        video.set_progress(40, "Creating short 2/5...");
        video.fail("FFmpeg is not installed");
        assert_eq!(video.status, VideoStatus::Failed);
        assert_eq!(video.progress, 40);
        assert_eq!(video.message, "FFmpeg is not installed");
    }

    #[test]
    fn apply_probe_fills_metadata() {
        let mut video = SourceVideo::new("Talk", "/uploads/talk.mp4");
        video.apply_probe(&SourceProbe {
            duration: 125.0,
            width: 1920,
            height: 1080,
            file_size: 1024,
        });
        assert_eq!(video.duration, Some(125.0));
        assert_eq!(video.resolution().as_deref(), Some("1920x1080"));
    }

    #[test]
    fn progress_is_clamped() {
        let mut video = SourceVideo::new("Talk", "/uploads/talk.mp4");
        video.set_progress(150, "clamped");
        assert_eq!(video.progress, 100);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&VideoStatus::Processing).unwrap();
        assert_eq!(json, "\"processing\"");
    }
}
