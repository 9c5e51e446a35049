//! Segmentation worker binary.
//!
//! One-shot invocation: takes one or more source files on the command line,
//! runs each through the pipeline, and prints a run summary. Options come
//! from the environment (`SHORTSPLIT_*`, see `PipelineConfig::from_env`),
//! plus `SHORTSPLIT_TARGET_DURATION`, `SHORTSPLIT_MAX_SEGMENTS` and
//! `SHORTSPLIT_CROP_MODE`.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shortsplit_media::FfmpegTranscoder;
use shortsplit_models::{CropMode, SourceVideo, VideoStatus};
use shortsplit_pipeline::{InMemoryStatusStore, PipelineConfig, RunPool, SegmentationPipeline};

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shortsplit=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let inputs: Vec<String> = std::env::args().skip(1).collect();
    if inputs.is_empty() {
        bail!("usage: shortsplit-worker <video file> [<video file> ...]");
    }

    let crop_mode: CropMode = std::env::var("SHORTSPLIT_CROP_MODE")
        .unwrap_or_default()
        .parse()
        .unwrap_or_default();

    let config = PipelineConfig::from_env();
    info!(?config, "starting shortsplit-worker");

    let store = Arc::new(InMemoryStatusStore::new());
    let pipeline = Arc::new(SegmentationPipeline::new(
        Arc::new(FfmpegTranscoder::new()),
        store.clone(),
        config.clone(),
    ));
    let pool = RunPool::new(pipeline, config.max_concurrent_runs);

    let mut handles = Vec::new();
    for input in inputs {
        let title = std::path::Path::new(&input)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.clone());

        let mut video = SourceVideo::new(title, &input);
        if let Some(target) = env_u32("SHORTSPLIT_TARGET_DURATION") {
            video = video.with_target_duration(target);
        }
        if let Some(max) = env_u32("SHORTSPLIT_MAX_SEGMENTS") {
            video = video.with_max_segments(max);
        }

        info!(video_id = %video.id, input = %input, "queueing run");
        handles.push(pool.spawn(video, crop_mode));
    }

    let mut failed = 0usize;
    for handle in handles {
        let report = handle.await.context("run task panicked")?;
        match report.status() {
            VideoStatus::Completed => {
                info!(
                    video_id = %report.video.id,
                    created = report.segments.len(),
                    planned = report.planned,
                    failures = report.failures.len(),
                    "{}", report.video.message
                );
            }
            _ => {
                failed += 1;
                warn!(
                    video_id = %report.video.id,
                    "{}", report.video.message
                );
            }
        }
    }

    if failed > 0 {
        bail!("{} run(s) failed", failed);
    }
    Ok(())
}
