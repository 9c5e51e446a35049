//! Segmentation planning.
//!
//! The planner is a pure function: given a source duration and the user's
//! segment parameters it decides how many segments fit and where each one
//! starts. All scheduling decisions live here so they can be tested without
//! touching an encoder.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed range for the target segment length, in seconds.
pub const TARGET_DURATION_RANGE: std::ops::RangeInclusive<u32> = 15..=180;
/// Allowed range for the segment count cap.
pub const MAX_SEGMENTS_RANGE: std::ops::RangeInclusive<u32> = 1..=50;

/// Errors from segment planning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("target duration {0}s is outside the allowed range 15-180s")]
    TargetDurationOutOfRange(u32),

    #[error("max segment count {0} is outside the allowed range 1-50")]
    MaxSegmentsOutOfRange(u32),

    #[error("source is too short to cut: {duration:.1}s with a {target}s target")]
    InsufficientDuration { duration: f64, target: u32 },
}

/// One planned segment window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedSegment {
    /// 1-based position within the plan
    pub index: u32,
    /// Start offset in the source, in seconds
    pub start: f64,
    /// Window length in seconds; equals the target except for a clamped tail
    pub duration: f64,
}

/// An ordered, non-overlapping sequence of segment windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentPlan {
    /// Source duration the plan was computed against
    pub source_duration: f64,
    /// Target segment length used
    pub target_duration: u32,
    /// Planned windows, ordered by start time
    pub segments: Vec<PlannedSegment>,
}

impl SegmentPlan {
    /// Number of planned segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Compute the segment plan for a source.
///
/// `num_segments = min(floor(duration / target), max)`; segment `i`
/// (0-indexed) starts at `i * target` and runs for the target length, except
/// the last window which is clamped to the source end, never padded.
pub fn plan_segments(
    duration: f64,
    target_duration: u32,
    max_segments: u32,
) -> Result<SegmentPlan, PlanError> {
    if !TARGET_DURATION_RANGE.contains(&target_duration) {
        return Err(PlanError::TargetDurationOutOfRange(target_duration));
    }
    if !MAX_SEGMENTS_RANGE.contains(&max_segments) {
        return Err(PlanError::MaxSegmentsOutOfRange(max_segments));
    }

    let target = f64::from(target_duration);
    let num_segments = if duration > 0.0 {
        ((duration / target).floor() as u32).min(max_segments)
    } else {
        0
    };

    if num_segments == 0 {
        return Err(PlanError::InsufficientDuration {
            duration,
            target: target_duration,
        });
    }

    let segments = (0..num_segments)
        .map(|i| {
            let start = f64::from(i) * target;
            let window = if start + target > duration {
                duration - start
            } else {
                target
            };
            PlannedSegment {
                index: i + 1,
                start,
                duration: window,
            }
        })
        .collect();

    Ok(SegmentPlan {
        source_duration: duration,
        target_duration,
        segments,
    })
}
