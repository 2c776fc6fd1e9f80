//! Configuration for the transcoding engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to find ffmpeg and how to invoke it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Explicit path to the ffmpeg binary. A bare name is looked up on `PATH`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Directory holding a bundled ffmpeg. Defaults to the directory of the
    /// running executable and its `resources/` subdirectory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_dir: Option<PathBuf>,

    /// Fall back to searching `PATH`.
    #[serde(default = "default_search_path")]
    pub search_path: bool,

    /// Pass `-y` so ffmpeg replaces an existing destination.
    #[serde(default)]
    pub overwrite: bool,
}

fn default_search_path() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: None,
            resource_dir: None,
            search_path: default_search_path(),
            overwrite: false,
        }
    }
}

impl EngineConfig {
    /// Creates a config pinned to an explicit ffmpeg path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Default::default()
        }
    }

    /// Sets the bundled resource directory.
    pub fn with_resource_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.resource_dir = Some(dir.into());
        self
    }

    /// Enables or disables the `PATH` fallback.
    pub fn with_search_path(mut self, search_path: bool) -> Self {
        self.search_path = search_path;
        self
    }

    /// Enables or disables overwriting existing destinations.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}
