//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tracing::{info, warn};

use super::config::EngineConfig;
use super::engine::EngineLocator;
use super::error::TranscodeError;
use super::traits::Transcoder;
use super::types::{TranscodeRequest, TranscodeSummary};

/// Number of trailing stderr lines kept in a failure report.
const STDERR_TAIL_LINES: usize = 20;

/// Runs ffmpeg as a subprocess to drop the video stream and re-encode audio.
pub struct FfmpegTranscoder {
    config: EngineConfig,
    locator: EngineLocator,
}

impl FfmpegTranscoder {
    /// Creates a new FFmpeg transcoder with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        let locator = EngineLocator::from_config(&config);
        Self { config, locator }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Replaces the engine locator.
    pub fn with_locator(mut self, locator: EngineLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Builds the ffmpeg argument list for a request.
    ///
    /// Always `-i <source> -vn -acodec <encoder> <destination>`, preceded by
    /// `-y` only when overwriting is enabled.
    pub fn build_args(&self, request: &TranscodeRequest) -> Vec<OsString> {
        let mut args = Vec::with_capacity(7);

        if self.config.overwrite {
            args.push(OsString::from("-y"));
        }

        args.extend([
            OsString::from("-i"),
            request.source().as_os_str().to_os_string(),
            OsString::from("-vn"),
            OsString::from("-acodec"),
            OsString::from(request.encoder()),
            request.destination().as_os_str().to_os_string(),
        ]);

        args
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn transcode(
        &self,
        request: &TranscodeRequest,
    ) -> Result<TranscodeSummary, TranscodeError> {
        let engine = self.locator.locate()?;
        let args = self.build_args(request);

        info!(
            "Extracting {} audio from {} to {}",
            request.format(),
            request.source().display(),
            request.destination().display()
        );

        let start = Instant::now();

        // kill_on_drop terminates ffmpeg if this future is dropped mid-run.
        let child = Command::new(&engine)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscodeError::engine_unavailable(format!(
                        "{} could not be executed: {}",
                        engine.display(),
                        e
                    ))
                } else {
                    TranscodeError::transcode_failed(
                        format!("Failed to launch {}: {}", engine.display(), e),
                        None,
                    )
                }
            })?;

        let output = child.wait_with_output().await.map_err(|e| {
            TranscodeError::transcode_failed(format!("Failed waiting for ffmpeg: {}", e), None)
        })?;

        if !output.status.success() {
            let reason = describe_exit(output.status);
            warn!("{} for {}", reason, request.source().display());
            return Err(TranscodeError::transcode_failed(
                reason,
                stderr_tail(&output.stderr),
            ));
        }

        let output_meta = tokio::fs::metadata(request.destination())
            .await
            .map_err(|_| TranscodeError::transcode_failed("Output file not created", None))?;

        let summary = TranscodeSummary {
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Wrote {} ({} bytes) in {} ms",
            request.destination().display(),
            summary.output_size_bytes,
            summary.duration_ms
        );

        Ok(summary)
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        let engine = self.locator.locate()?;

        let output = Command::new(&engine)
            .arg("-version")
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| {
                TranscodeError::engine_unavailable(format!(
                    "{} could not be executed: {}",
                    engine.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            return Err(TranscodeError::engine_unavailable(format!(
                "{} -version failed: {}",
                engine.display(),
                describe_exit(output.status)
            )));
        }

        Ok(())
    }
}

fn describe_exit(status: ExitStatus) -> String {
    if let Some(code) = status.code() {
        return format!("ffmpeg exited with code {}", code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return format!("ffmpeg terminated by signal {}", signal);
        }
    }

    "ffmpeg terminated abnormally".to_string()
}

fn stderr_tail(stderr: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return None;
    }

    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    Some(lines[start..].join("\n"))
}
