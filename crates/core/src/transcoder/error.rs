//! Error types for the transcoder module.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while preparing or running a transcode.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The transcoding executable could not be located.
    #[error("Transcoding engine not available: {reason}")]
    EngineUnavailable { reason: String },

    /// The destination extension has no codec mapping.
    #[error("Unsupported output format: {extension:?}")]
    UnsupportedFormat { extension: String },

    /// The engine could not be launched or exited unsuccessfully.
    #[error("Transcode failed: {reason}")]
    TranscodeFailed {
        reason: String,
        stderr: Option<String>,
    },

    /// A dropped item does not resolve to a single regular file.
    #[error("Invalid drop item {item:?}: {reason}")]
    InvalidDrop { item: String, reason: String },

    /// I/O error while preparing a run.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializable classification of a [`TranscodeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    EngineUnavailable,
    UnsupportedFormat,
    TranscodeFailed,
    InvalidDrop,
    Io,
}

impl TranscodeError {
    /// Creates an engine unavailable error.
    pub fn engine_unavailable(reason: impl Into<String>) -> Self {
        Self::EngineUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates an unsupported format error for the given extension.
    pub fn unsupported_format(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Creates a transcode failed error with optional stderr output.
    pub fn transcode_failed(reason: impl Into<String>, stderr: Option<String>) -> Self {
        Self::TranscodeFailed {
            reason: reason.into(),
            stderr,
        }
    }

    /// Creates an invalid drop error.
    pub fn invalid_drop(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDrop {
            item: item.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid drop error for a path.
    pub(crate) fn invalid_drop_path(path: &Path, reason: impl Into<String>) -> Self {
        Self::invalid_drop(path.display().to_string(), reason)
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EngineUnavailable { .. } => ErrorKind::EngineUnavailable,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::TranscodeFailed { .. } => ErrorKind::TranscodeFailed,
            Self::InvalidDrop { .. } => ErrorKind::InvalidDrop,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Human readable failure detail, including captured stderr when present.
    pub fn detail(&self) -> String {
        match self {
            Self::TranscodeFailed {
                stderr: Some(stderr),
                ..
            } if !stderr.trim().is_empty() => format!("{}\n{}", self, stderr.trim_end()),
            _ => self.to_string(),
        }
    }
}
