//! Pipeline configuration.

use std::path::PathBuf;
use std::time::Duration;

/// What to do when one segment fails to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Skip the failed segment and keep going; it is recorded in the run
    /// report. Matches the historical behavior.
    #[default]
    Continue,
    /// Stop at the first failed segment; already-created segments are kept.
    Abort,
}

impl FailurePolicy {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "continue" => Some(Self::Continue),
            "abort" => Some(Self::Abort),
            _ => None,
        }
    }
}

/// Settings for segmentation runs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory for outputs; segments land in `shorts/{video_id}/`
    /// and thumbnails in `thumbnails/{video_id}/` beneath it.
    pub media_root: PathBuf,
    /// Per-segment failure handling
    pub failure_policy: FailurePolicy,
    /// Per-segment encoder timeout; `None` lets an invocation run
    /// indefinitely
    pub segment_timeout: Option<Duration>,
    /// Maximum segmentation runs in flight at once (for [`crate::RunPool`])
    pub max_concurrent_runs: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            media_root: PathBuf::from("/tmp/shortsplit"),
            failure_policy: FailurePolicy::default(),
            segment_timeout: None,
            max_concurrent_runs: 2,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            media_root: std::env::var("SHORTSPLIT_MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.media_root),
            failure_policy: std::env::var("SHORTSPLIT_ON_SEGMENT_FAILURE")
                .ok()
                .and_then(|s| FailurePolicy::parse(&s))
                .unwrap_or_default(),
            segment_timeout: std::env::var("SHORTSPLIT_SEGMENT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
            max_concurrent_runs: std::env::var("SHORTSPLIT_MAX_RUNS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_concurrent_runs),
        }
    }

    pub fn with_media_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.media_root = root.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_continue_on_failure_without_timeout() {
        let config = PipelineConfig::default();
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert!(config.segment_timeout.is_none());
        assert_eq!(config.max_concurrent_runs, 2);
    }

    #[test]
    fn failure_policy_parses_case_insensitively() {
        assert_eq!(FailurePolicy::parse("Abort"), Some(FailurePolicy::Abort));
        assert_eq!(
            FailurePolicy::parse("CONTINUE"),
            Some(FailurePolicy::Continue)
        );
        assert_eq!(FailurePolicy::parse("retry"), None);
    }
}
