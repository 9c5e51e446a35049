//! Pipeline error types.

use thiserror::Error;

use shortsplit_media::MediaError;
use shortsplit_models::PlanError;

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal run errors.
///
/// Per-segment encode failures are not errors at this level; they are
/// collected into the run report. These variants abort the whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("required tools are missing: {0}")]
    ToolUnavailable(String),

    #[error("video analysis failed: {0}")]
    Probe(#[source] MediaError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// User-facing message stored on the failed record.
    pub fn user_message(&self) -> String {
        match self {
            PipelineError::ToolUnavailable(_) => {
                "FFmpeg is not installed. Install FFmpeg and FFprobe and make sure they are on PATH.".to_string()
            }
            other => format!("Error: {}", other),
        }
    }
}
