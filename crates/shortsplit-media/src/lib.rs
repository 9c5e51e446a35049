//! FFmpeg CLI wrapper for the shortsplit pipeline.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - A process runner with stderr capture and optional timeout
//! - Source metadata probing via FFprobe
//! - Segment encoding with a centered 9:16 crop
//! - Single-frame thumbnail extraction
//! - The [`Transcoder`] trait so pipeline logic is testable without the
//!   actual binaries

pub mod command;
pub mod encode;
pub mod error;
pub mod filters;
pub mod probe;
pub mod thumbnail;
pub mod transcoder;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner, ProcessOutput};
pub use encode::{encode_segment, EncodeRequest};
pub use error::{MediaError, MediaResult};
pub use filters::portrait_filter;
pub use probe::probe_source;
pub use thumbnail::{extract_frame, FrameRequest};
pub use transcoder::{FfmpegTranscoder, Transcoder};
