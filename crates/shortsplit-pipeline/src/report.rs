//! Run reports.

use shortsplit_models::{SegmentRecord, SourceVideo, VideoStatus};

/// One planned segment that did not produce output.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentFailure {
    /// 1-based plan index of the failed segment
    pub index: u32,
    /// Human-readable cause (encoder diagnostics summary)
    pub reason: String,
}

/// Final outcome of a segmentation run.
///
/// Failures are first-class here: a segment that could not be encoded is
/// listed alongside the successes instead of being silently skipped.
#[derive(Debug)]
pub struct RunReport {
    /// The record with its final status/progress fields
    pub video: SourceVideo,
    /// Segments created, in plan order
    pub segments: Vec<SegmentRecord>,
    /// Planned segments that failed to encode
    pub failures: Vec<SegmentFailure>,
    /// How many segments the planner decided on (0 if planning never ran)
    pub planned: u32,
}

impl RunReport {
    /// Final status of the run.
    pub fn status(&self) -> VideoStatus {
        self.video.status
    }

    /// True when every planned segment was created.
    pub fn is_complete(&self) -> bool {
        self.video.status == VideoStatus::Completed && self.failures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_means_no_failures() {
        let mut video = SourceVideo::new("T", "/in.mp4");
        video.complete("Done");
        let report = RunReport {
            video,
            segments: Vec::new(),
            failures: vec![SegmentFailure {
                index: 2,
                reason: "encoder crashed".into(),
            }],
            planned: 3,
        };
        assert_eq!(report.status(), VideoStatus::Completed);
        assert!(!report.is_complete());
    }
}
