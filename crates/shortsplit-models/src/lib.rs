//! Shared data models for the shortsplit segmentation pipeline.

pub mod crop;
pub mod encoding;
pub mod plan;
pub mod segment;
pub mod video;

pub use crop::CropMode;
pub use encoding::EncodingConfig;
pub use plan::{plan_segments, PlanError, PlannedSegment, SegmentPlan};
pub use segment::SegmentRecord;
pub use video::{SourceProbe, SourceVideo, VideoId, VideoStatus};
