//! FFprobe source metadata extraction.

use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use shortsplit_models::SourceProbe;

use crate::error::{MediaError, MediaResult};

/// FFprobe JSON output.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    size: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
}

/// Probe a source file for duration, resolution and size.
///
/// Read-only; fails if ffprobe is missing, exits non-zero, or the file has
/// no video stream.
pub async fn probe_source(path: impl AsRef<Path>) -> MediaResult<SourceProbe> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::FfprobeFailed {
            message: format!("ffprobe exited with {:?}", output.status.code()),
            stderr: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
        });
    }

    parse_probe_output(&output.stdout, path)
}

/// Parse FFprobe's JSON into a [`SourceProbe`].
fn parse_probe_output(stdout: &[u8], path: &Path) -> MediaResult<SourceProbe> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)?;

    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| MediaError::NoVideoStream(path.to_path_buf()))?;

    // A container without a readable duration is an analysis failure, not
    // a zero-length video
    let duration = probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| MediaError::FfprobeFailed {
            message: format!("no readable duration for {}", path.display()),
            stderr: None,
        })?;

    let file_size = probe
        .format
        .size
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    Ok(SourceProbe {
        duration,
        width: video_stream.width.unwrap_or(0),
        height: video_stream.height.unwrap_or(0),
        file_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_format_and_video_stream() {
        let json = br#"{
            "format": {"duration": "125.500000", "size": "10485760"},
            "streams": [
                {"codec_type": "audio"},
                {"codec_type": "video", "width": 1920, "height": 1080}
            ]
        }"#;
        let probe = parse_probe_output(json, Path::new("a.mp4")).unwrap();
        assert!((probe.duration - 125.5).abs() < 1e-9);
        assert_eq!(probe.width, 1920);
        assert_eq!(probe.height, 1080);
        assert_eq!(probe.file_size, 10_485_760);
    }

    #[test]
    fn rejects_audio_only_files() {
        let json = br#"{
            "format": {"duration": "30.0", "size": "100"},
            "streams": [{"codec_type": "audio"}]
        }"#;
        let err = parse_probe_output(json, Path::new("a.m4a")).unwrap_err();
        assert!(matches!(err, MediaError::NoVideoStream(_)));
    }

    #[test]
    fn rejects_garbage_output() {
        let err = parse_probe_output(b"not json", Path::new("a.mp4")).unwrap_err();
        assert!(matches!(err, MediaError::JsonParse(_)));
    }

    #[test]
    fn missing_duration_is_an_analysis_failure() {
        let json = br#"{
            "format": {"size": "100"},
            "streams": [{"codec_type": "video", "width": 640, "height": 480}]
        }"#;
        let err = parse_probe_output(json, Path::new("a.mp4")).unwrap_err();
        assert!(matches!(err, MediaError::FfprobeFailed { .. }));
    }

    #[test]
    fn unparsable_duration_is_an_analysis_failure() {
        let json = br#"{
            "format": {"duration": "N/A", "size": "100"},
            "streams": [{"codec_type": "video", "width": 640, "height": 480}]
        }"#;
        let err = parse_probe_output(json, Path::new("a.mp4")).unwrap_err();
        assert!(matches!(err, MediaError::FfprobeFailed { .. }));
    }

    #[test]
    fn missing_size_defaults_to_zero() {
        let json = br#"{
            "format": {"duration": "30.0"},
            "streams": [{"codec_type": "video", "width": 640, "height": 480}]
        }"#;
        let probe = parse_probe_output(json, Path::new("a.mp4")).unwrap();
        assert_eq!(probe.file_size, 0);
    }
}
