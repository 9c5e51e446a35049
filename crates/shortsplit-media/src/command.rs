//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Builder for FFmpeg invocations.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    /// Input file path
    input: PathBuf,
    /// Output file path
    output: PathBuf,
    /// Arguments placed before -i
    input_args: Vec<String>,
    /// Arguments placed after -i
    output_args: Vec<String>,
}

impl FfmpegCommand {
    /// Create a new command. Output is always overwritten (`-y`) and the
    /// log level pinned to `error` so stderr only carries diagnostics.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
        }
    }

    /// Add an argument before `-i`.
    pub fn input_arg(mut self, arg: impl Into<String>) -> Self {
        self.input_args.push(arg.into());
        self
    }

    /// Add an argument after `-i`.
    pub fn output_arg(mut self, arg: impl Into<String>) -> Self {
        self.output_args.push(arg.into());
        self
    }

    /// Add multiple output arguments.
    pub fn output_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Seek to a position before decoding starts.
    pub fn seek(self, seconds: f64) -> Self {
        self.input_arg("-ss").input_arg(format!("{:.3}", seconds))
    }

    /// Limit how many seconds are read from the input.
    pub fn read_duration(self, seconds: f64) -> Self {
        self.output_arg("-t").output_arg(format!("{:.3}", seconds))
    }

    /// Set the video filter chain.
    pub fn video_filter(self, filter: impl Into<String>) -> Self {
        self.output_arg("-vf").output_arg(filter)
    }

    /// Emit exactly one frame.
    pub fn single_frame(self) -> Self {
        self.output_arg("-vframes").output_arg("1")
    }

    /// Build the full argument list.
    pub fn build_args(&self) -> Vec<String> {
        let mut args = vec!["-y".to_string(), "-v".to_string(), "error".to_string()];
        args.extend(self.input_args.clone());
        args.push("-i".to_string());
        args.push(self.input.to_string_lossy().to_string());
        args.extend(self.output_args.clone());
        args.push(self.output.to_string_lossy().to_string());
        args
    }

    /// Output path the command writes to.
    pub fn output_path(&self) -> &Path {
        &self.output
    }
}

/// Outcome of one FFmpeg invocation.
///
/// A non-zero exit is not turned into an error here: callers that judge
/// success by evidence (the output file existing) need the raw status and
/// the captured diagnostics.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Whether the process exited zero
    pub success: bool,
    /// Raw exit code, if the process was not killed by a signal
    pub exit_code: Option<i32>,
    /// Captured stderr (FFmpeg diagnostics)
    pub stderr: String,
}

/// Runner for FFmpeg commands with an optional timeout.
#[derive(Debug, Default)]
pub struct FfmpegRunner {
    /// Kill the process after this long, if set
    timeout: Option<Duration>,
}

impl FfmpegRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound a single invocation; a hung encoder is killed and reported as
    /// [`MediaError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Run an FFmpeg command to completion, capturing stderr.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<ProcessOutput> {
        which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)?;

        let args = cmd.build_args();
        debug!(args = %args.join(" "), "running ffmpeg");

        // kill_on_drop so a timed-out invocation does not leave an orphaned
        // encoder running
        let child = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = match self.timeout {
            Some(limit) => {
                match tokio::time::timeout(limit, child.wait_with_output()).await {
                    Ok(result) => result?,
                    Err(_) => {
                        warn!(timeout_secs = limit.as_secs(), "ffmpeg timed out");
                        return Err(MediaError::Timeout(limit.as_secs()));
                    }
                }
            }
            None => child.wait_with_output().await?,
        };

        Ok(ProcessOutput {
            success: output.status.success(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Check that FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

/// Check that FFprobe is available.
pub fn check_ffprobe() -> MediaResult<PathBuf> {
    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_orders_seek_before_input() {
        let cmd = FfmpegCommand::new("in.mp4", "out.mp4")
            .seek(60.0)
            .read_duration(30.0);
        let args = cmd.build_args();

        let ss = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        let t = args.iter().position(|a| a == "-t").unwrap();
        assert!(ss < input, "-ss must precede -i for fast seeking");
        assert!(input < t);
        assert_eq!(args[ss + 1], "60.000");
        assert_eq!(args[t + 1], "30.000");
    }

    #[test]
    fn builder_always_overwrites_quietly() {
        let args = FfmpegCommand::new("in.mp4", "out.mp4").build_args();
        assert_eq!(args[0], "-y");
        assert_eq!(&args[1..3], ["-v", "error"]);
        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn single_frame_flag() {
        let args = FfmpegCommand::new("in.mp4", "thumb.jpg")
            .single_frame()
            .build_args();
        let pos = args.iter().position(|a| a == "-vframes").unwrap();
        assert_eq!(args[pos + 1], "1");
    }
}
