//! Turning dropped items into source file paths.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::transcoder::TranscodeError;

/// Type identifier of a dropped item carrying a file URL.
pub const FILE_URL_TYPE: &str = "public.file-url";

const FILE_SCHEME: &str = "file://";

/// Data carried by a dropped item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropPayload {
    /// Text as announced by the drop source: a `file://` URL or a plain path.
    Text(String),
    /// A filesystem path, kept byte for byte.
    Path(PathBuf),
}

impl fmt::Display for DropPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One item of a drop payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropItem {
    /// Type identifier announced by the drop source.
    pub type_identifier: String,
    pub payload: DropPayload,
}

impl DropItem {
    /// Creates a file-URL item from a URL or plain path string.
    pub fn file_url(payload: impl Into<String>) -> Self {
        Self {
            type_identifier: FILE_URL_TYPE.to_string(),
            payload: DropPayload::Text(payload.into()),
        }
    }

    /// Creates a file-URL item for a filesystem path.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            type_identifier: FILE_URL_TYPE.to_string(),
            payload: DropPayload::Path(path.into()),
        }
    }

    /// Creates an item of an arbitrary type.
    pub fn other(type_identifier: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            type_identifier: type_identifier.into(),
            payload: DropPayload::Text(payload.into()),
        }
    }

    /// Whether this item claims to carry a file URL.
    pub fn is_file_url(&self) -> bool {
        self.type_identifier == FILE_URL_TYPE
    }
}

/// Resolves a dropped item to the absolute path of an existing regular file.
pub fn resolve_drop(item: &DropItem) -> Result<PathBuf, TranscodeError> {
    if !item.is_file_url() {
        return Err(TranscodeError::invalid_drop(
            item.payload.to_string(),
            format!("unsupported drop type {}", item.type_identifier),
        ));
    }

    let path = match &item.payload {
        DropPayload::Path(path) if path.as_os_str().is_empty() => {
            return Err(TranscodeError::invalid_drop("", "empty payload"));
        }
        DropPayload::Path(path) => path.clone(),
        DropPayload::Text(text) => payload_to_path(text.trim())
            .map_err(|reason| TranscodeError::invalid_drop(text.as_str(), reason))?,
    };

    let metadata = std::fs::metadata(&path)
        .map_err(|_| TranscodeError::invalid_drop_path(&path, "does not exist"))?;
    if metadata.is_dir() {
        return Err(TranscodeError::invalid_drop_path(&path, "is a directory"));
    }
    if !metadata.is_file() {
        return Err(TranscodeError::invalid_drop_path(&path, "is not a regular file"));
    }

    Ok(std::path::absolute(&path)?)
}

/// Resolves every item independently, in drop order.
pub fn resolve_drops(items: &[DropItem]) -> Vec<Result<PathBuf, TranscodeError>> {
    items.iter().map(resolve_drop).collect()
}

/// Default output file name offered for a source: its stem without extension.
pub fn suggested_name(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "audio".to_string())
}

fn payload_to_path(payload: &str) -> Result<PathBuf, String> {
    if payload.is_empty() {
        return Err("empty payload".to_string());
    }

    let Some(rest) = payload.strip_prefix(FILE_SCHEME) else {
        if payload.contains("://") {
            return Err("not a file URL".to_string());
        }
        return Ok(PathBuf::from(payload));
    };

    let encoded = if rest.starts_with('/') {
        rest
    } else if rest.starts_with("localhost/") {
        &rest["localhost".len()..]
    } else {
        return Err("file URL points at a remote host".to_string());
    };

    let encoded = encoded
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    let decoded = urlencoding::decode(encoded)
        .map_err(|e| format!("malformed file URL: {}", e))?;
    if decoded.is_empty() {
        return Err("file URL has no path".to_string());
    }

    Ok(PathBuf::from(decoded.into_owned()))
}
