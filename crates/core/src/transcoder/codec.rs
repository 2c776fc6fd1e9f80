//! Output format to encoder mapping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::error::TranscodeError;

/// Audio output formats, keyed by destination file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// MPEG-4 audio (.m4a)
    M4a,
    /// Free Lossless Audio Codec
    Flac,
    /// MPEG Audio Layer III
    Mp3,
    /// WAVE, 16-bit PCM
    Wav,
    /// Windows Media Audio
    Wma,
    /// Raw ADTS AAC
    Aac,
}

impl AudioFormat {
    /// Every supported format, in the order offered to users.
    pub const ALL: [AudioFormat; 6] = [
        Self::M4a,
        Self::Flac,
        Self::Mp3,
        Self::Wav,
        Self::Wma,
        Self::Aac,
    ];

    /// Looks up a format by extension, ignoring case and a leading dot.
    pub fn from_extension(extension: &str) -> Result<Self, TranscodeError> {
        let normalized = extension
            .strip_prefix('.')
            .unwrap_or(extension)
            .to_ascii_lowercase();
        match normalized.as_str() {
            "m4a" => Ok(Self::M4a),
            "flac" => Ok(Self::Flac),
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            "wma" => Ok(Self::Wma),
            "aac" => Ok(Self::Aac),
            _ => Err(TranscodeError::unsupported_format(extension)),
        }
    }

    /// Looks up a format from the extension of a destination path.
    pub fn from_path(path: &Path) -> Result<Self, TranscodeError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| TranscodeError::unsupported_format(""))?;
        Self::from_extension(extension)
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::M4a => "m4a",
            Self::Flac => "flac",
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::Wma => "wma",
            Self::Aac => "aac",
        }
    }

    /// Returns the ffmpeg encoder name passed after `-acodec`.
    pub fn encoder(&self) -> &'static str {
        match self {
            Self::M4a => "aac",
            Self::Flac => "flac",
            Self::Mp3 => "libmp3lame",
            Self::Wav => "pcm_s16le",
            Self::Wma => "wmav2",
            Self::Aac => "aac",
        }
    }

    /// Whether this format is lossless.
    pub fn is_lossless(&self) -> bool {
        matches!(self, Self::Flac | Self::Wav)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for AudioFormat {
    type Err = TranscodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}

/// Resolves an output extension to the encoder identifier ffmpeg expects.
pub fn resolve_codec(extension: &str) -> Result<&'static str, TranscodeError> {
    AudioFormat::from_extension(extension).map(|format| format.encoder())
}
