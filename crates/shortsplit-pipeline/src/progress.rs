//! Progress reporting.
//!
//! The pipeline never writes to a persistence layer directly; it pushes
//! updates through a [`ProgressSink`] so the surrounding system decides
//! where status lives. [`InMemoryStatusStore`] is the built-in sink backing
//! a polling API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::warn;

use shortsplit_models::{VideoId, VideoStatus};

/// Receiver for run-progress updates.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Record a status transition.
    async fn set_status(&self, id: &VideoId, status: VideoStatus);

    /// Record progress percentage and the current step description.
    async fn set_progress(&self, id: &VideoId, percent: u8, message: &str);

    /// Record how many segments the planner decided on.
    async fn set_planned_total(&self, id: &VideoId, total: u32);

    /// Bump the created-segment counter.
    async fn increment_created(&self, id: &VideoId);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone)]
pub struct NoopSink;

#[async_trait]
impl ProgressSink for NoopSink {
    async fn set_status(&self, _id: &VideoId, _status: VideoStatus) {}
    async fn set_progress(&self, _id: &VideoId, _percent: u8, _message: &str) {}
    async fn set_planned_total(&self, _id: &VideoId, _total: u32) {}
    async fn increment_created(&self, _id: &VideoId) {}
}

/// Point-in-time view of one run, as exposed to a polling UI.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub status: VideoStatus,
    pub progress: u8,
    pub message: String,
    pub segments_total: u32,
    pub segments_created: u32,
    pub updated_at: DateTime<Utc>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            status: VideoStatus::Uploaded,
            progress: 0,
            message: String::new(),
            segments_total: 0,
            segments_created: 0,
            updated_at: Utc::now(),
        }
    }
}

/// Shared in-memory status store.
///
/// One entry per video id; runs never share an id, so writers don't
/// contend on the same entry.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStatusStore {
    entries: Arc<RwLock<HashMap<VideoId, StatusSnapshot>>>,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot for a run, if any update has been seen.
    pub async fn get(&self, id: &VideoId) -> Option<StatusSnapshot> {
        self.entries.read().await.get(id).cloned()
    }

    /// Number of tracked runs.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Mark runs stuck in `Processing` with no update for `max_age` as
    /// failed, so a crashed worker cannot leave a record processing
    /// forever. Returns the ids that were swept.
    pub async fn sweep_stale(&self, max_age: Duration) -> Vec<VideoId> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(max_age).unwrap_or_else(|_| chrono::Duration::hours(1));
        let mut swept = Vec::new();

        let mut entries = self.entries.write().await;
        for (id, snapshot) in entries.iter_mut() {
            if snapshot.status == VideoStatus::Processing && snapshot.updated_at < cutoff {
                warn!(video_id = %id, updated_at = %snapshot.updated_at, "sweeping stale run");
                snapshot.status = VideoStatus::Failed;
                snapshot.message =
                    "Processing timed out. The worker may have crashed. Please try again."
                        .to_string();
                snapshot.updated_at = Utc::now();
                swept.push(id.clone());
            }
        }
        swept
    }

    async fn update<F>(&self, id: &VideoId, apply: F)
    where
        F: FnOnce(&mut StatusSnapshot),
    {
        let mut entries = self.entries.write().await;
        let snapshot = entries.entry(id.clone()).or_default();
        apply(snapshot);
        snapshot.updated_at = Utc::now();
    }
}

#[async_trait]
impl ProgressSink for InMemoryStatusStore {
    async fn set_status(&self, id: &VideoId, status: VideoStatus) {
        self.update(id, |s| s.status = status).await;
    }

    async fn set_progress(&self, id: &VideoId, percent: u8, message: &str) {
        let message = message.to_string();
        self.update(id, move |s| {
            s.progress = percent.min(100);
            s.message = message;
        })
        .await;
    }

    async fn set_planned_total(&self, id: &VideoId, total: u32) {
        self.update(id, move |s| s.segments_total = total).await;
    }

    async fn increment_created(&self, id: &VideoId) {
        self.update(id, |s| s.segments_created += 1).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_tracks_updates_per_video() {
        let store = InMemoryStatusStore::new();
        let id = VideoId::from("vid-1");

        store.set_status(&id, VideoStatus::Processing).await;
        store.set_planned_total(&id, 3).await;
        store.set_progress(&id, 33, "Creating short 1/3...").await;
        store.increment_created(&id).await;

        let snapshot = store.get(&id).await.unwrap();
        assert_eq!(snapshot.status, VideoStatus::Processing);
        assert_eq!(snapshot.progress, 33);
        assert_eq!(snapshot.message, "Creating short 1/3...");
        assert_eq!(snapshot.segments_total, 3);
        assert_eq!(snapshot.segments_created, 1);
    }

    #[tokio::test]
    async fn unknown_video_has_no_snapshot() {
        let store = InMemoryStatusStore::new();
        assert!(store.get(&VideoId::from("nope")).await.is_none());
    }

    #[tokio::test]
    async fn sweep_fails_only_stale_processing_runs() {
        let store = InMemoryStatusStore::new();
        let stale = VideoId::from("stale");
        let fresh = VideoId::from("fresh");
        let done = VideoId::from("done");

        store.set_status(&stale, VideoStatus::Processing).await;
        store.set_status(&fresh, VideoStatus::Processing).await;
        store.set_status(&done, VideoStatus::Completed).await;

        // Backdate the stale entry
        {
            let mut entries = store.entries.write().await;
            entries.get_mut(&stale).unwrap().updated_at = Utc::now() - chrono::Duration::hours(2);
            entries.get_mut(&done).unwrap().updated_at = Utc::now() - chrono::Duration::hours(2);
        }

        let swept = store.sweep_stale(Duration::from_secs(3600)).await;
        assert_eq!(swept, vec![stale.clone()]);
        assert_eq!(store.get(&stale).await.unwrap().status, VideoStatus::Failed);
        assert_eq!(
            store.get(&fresh).await.unwrap().status,
            VideoStatus::Processing
        );
        assert_eq!(
            store.get(&done).await.unwrap().status,
            VideoStatus::Completed
        );
    }
}
