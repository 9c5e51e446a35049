//! Segmentation run orchestration.
//!
//! A run takes a [`shortsplit_models::SourceVideo`], probes it if needed,
//! plans the segment windows, encodes them strictly one at a time, extracts
//! a thumbnail per created segment, and reports progress through a
//! [`ProgressSink`]. The outcome is a [`RunReport`] with an explicit
//! per-segment failure list; fatal errors are translated into a terminal
//! `Failed` status, never surfaced as a panic or an `Err` from `run`.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod pool;
pub mod progress;
pub mod report;

pub use config::{FailurePolicy, PipelineConfig};
pub use error::{PipelineError, PipelineResult};
pub use pipeline::SegmentationPipeline;
pub use pool::RunPool;
pub use progress::{InMemoryStatusStore, NoopSink, ProgressSink, StatusSnapshot};
pub use report::{RunReport, SegmentFailure};
