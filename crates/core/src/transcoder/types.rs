//! Types for the transcoder module.

use serde::{Deserialize, Serialize, Serializer};
use std::path::{Path, PathBuf};

use super::codec::AudioFormat;
use super::error::{ErrorKind, TranscodeError};

/// A single audio extraction request.
///
/// Construction resolves the destination extension first, so a request for an
/// unmapped format never exists and never reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeRequest {
    id: String,
    source: PathBuf,
    destination: PathBuf,
    format: AudioFormat,
}

impl TranscodeRequest {
    /// Creates a request, deriving the output format from `destination`.
    ///
    /// Both paths are made absolute against the current directory, and must
    /// differ.
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
    ) -> Result<Self, TranscodeError> {
        let destination = destination.into();
        let format = AudioFormat::from_path(&destination)?;

        let source = std::path::absolute(source.into())?;
        let destination = std::path::absolute(destination)?;
        if source == destination {
            return Err(TranscodeError::invalid_drop_path(
                &destination,
                "destination is the source file",
            ));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            source,
            destination,
            format,
        })
    }

    /// Unique request ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Input video file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Output audio file.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Output format resolved from the destination extension.
    pub fn format(&self) -> AudioFormat {
        self.format
    }

    /// Encoder identifier passed to the engine.
    pub fn encoder(&self) -> &'static str {
        self.format.encoder()
    }
}

/// Measurements from a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeSummary {
    /// Size of the written output file.
    pub output_size_bytes: u64,
    /// Wall time spent in the engine, in milliseconds.
    pub duration_ms: u64,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranscodeOutcome {
    Succeeded {
        output_size_bytes: u64,
        duration_ms: u64,
    },
    Failed {
        kind: ErrorKind,
        reason: String,
    },
}

/// Final report for one request, handed back to the session owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeResult {
    pub request_id: String,
    #[serde(serialize_with = "serialize_lossy")]
    pub source: PathBuf,
    #[serde(serialize_with = "serialize_lossy")]
    pub destination: PathBuf,
    pub format: AudioFormat,
    #[serde(flatten)]
    pub outcome: TranscodeOutcome,
}

impl TranscodeResult {
    /// Builds the report for `request` from the transcoder's return value.
    pub fn from_run(
        request: &TranscodeRequest,
        run: Result<TranscodeSummary, TranscodeError>,
    ) -> Self {
        let outcome = match run {
            Ok(summary) => TranscodeOutcome::Succeeded {
                output_size_bytes: summary.output_size_bytes,
                duration_ms: summary.duration_ms,
            },
            Err(e) => TranscodeOutcome::Failed {
                kind: e.kind(),
                reason: e.detail(),
            },
        };

        Self {
            request_id: request.id().to_string(),
            source: request.source().to_path_buf(),
            destination: request.destination().to_path_buf(),
            format: request.format(),
            outcome,
        }
    }

    /// Whether the run succeeded.
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, TranscodeOutcome::Succeeded { .. })
    }

    /// Destination path, only when the run succeeded.
    pub fn output_path(&self) -> Option<&Path> {
        self.succeeded().then_some(self.destination.as_path())
    }

    /// Failure reason, only when the run failed.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            TranscodeOutcome::Failed { reason, .. } => Some(reason),
            TranscodeOutcome::Succeeded { .. } => None,
        }
    }

    /// Failure kind, only when the run failed.
    pub fn failure_kind(&self) -> Option<ErrorKind> {
        match &self.outcome {
            TranscodeOutcome::Failed { kind, .. } => Some(*kind),
            TranscodeOutcome::Succeeded { .. } => None,
        }
    }
}

// Non-UTF-8 names are legal paths but not JSON strings.
fn serialize_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_resolves_format() {
        let request = TranscodeRequest::new("/videos/clip.mov", "/music/clip.MP3").unwrap();
        assert_eq!(request.format(), AudioFormat::Mp3);
        assert_eq!(request.encoder(), "libmp3lame");
        assert_eq!(request.source(), Path::new("/videos/clip.mov"));
        assert_eq!(request.destination(), Path::new("/music/clip.MP3"));
        assert!(!request.id().is_empty());
    }

    #[test]
    fn test_request_rejects_unmapped_extension() {
        let err = TranscodeRequest::new("/videos/clip.mov", "/music/clip.ogg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);

        let err = TranscodeRequest::new("/videos/clip.mov", "/music/clip").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
    }

    #[test]
    fn test_request_makes_paths_absolute() {
        let request = TranscodeRequest::new("clip.mov", "clip.wav").unwrap();
        assert!(request.source().is_absolute());
        assert!(request.destination().is_absolute());
    }

    #[test]
    fn test_request_rejects_destination_equal_to_source() {
        let err = TranscodeRequest::new("/music/song.m4a", "/music/song.m4a").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDrop);
        assert!(err.to_string().contains("destination is the source file"));

        let cwd = std::env::current_dir().unwrap();
        let err = TranscodeRequest::new("song.m4a", cwd.join("song.m4a")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDrop);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = TranscodeRequest::new("/a.mov", "/a.aac").unwrap();
        let b = TranscodeRequest::new("/a.mov", "/a.aac").unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_result_from_success() {
        let request = TranscodeRequest::new("/videos/clip.mov", "/music/clip.flac").unwrap();
        let result = TranscodeResult::from_run(
            &request,
            Ok(TranscodeSummary {
                output_size_bytes: 2048,
                duration_ms: 15,
            }),
        );
        assert!(result.succeeded());
        assert_eq!(result.output_path(), Some(Path::new("/music/clip.flac")));
        assert!(result.failure_reason().is_none());
        assert_eq!(result.request_id, request.id());
    }

    #[test]
    fn test_result_from_failure() {
        let request = TranscodeRequest::new("/videos/clip.mov", "/music/clip.flac").unwrap();
        let result = TranscodeResult::from_run(
            &request,
            Err(TranscodeError::engine_unavailable("ffmpeg not found")),
        );
        assert!(!result.succeeded());
        assert!(result.output_path().is_none());
        assert_eq!(result.failure_kind(), Some(ErrorKind::EngineUnavailable));
        assert!(result.failure_reason().unwrap().contains("ffmpeg not found"));
    }

    #[test]
    fn test_result_serialization() {
        let request = TranscodeRequest::new("/videos/clip.mov", "/music/clip.wma").unwrap();
        let result = TranscodeResult::from_run(
            &request,
            Err(TranscodeError::transcode_failed("exit 1", None)),
        );
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "transcode_failed");
        assert_eq!(json["format"], "wma");
        assert_eq!(json["destination"], "/music/clip.wma");
    }

    #[cfg(unix)]
    #[test]
    fn test_result_serializes_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let source = Path::new("/videos").join(OsStr::from_bytes(b"clip\xff.mov"));
        let request = TranscodeRequest::new(&source, "/music/clip.mp3").unwrap();
        let result = TranscodeResult::from_run(
            &request,
            Ok(TranscodeSummary {
                output_size_bytes: 1,
                duration_ms: 1,
            }),
        );
        let json: serde_json::Value = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source"], "/videos/clip\u{fffd}.mov");
        assert_eq!(json["status"], "succeeded");
    }
}
