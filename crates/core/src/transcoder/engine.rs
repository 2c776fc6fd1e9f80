//! Locating the ffmpeg executable.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::config::EngineConfig;
use super::error::TranscodeError;

/// Base name of the transcoding executable.
pub const ENGINE_NAME: &str = "ffmpeg";

/// Subdirectory of the executable's directory searched for a bundled engine.
const RESOURCES_SUBDIR: &str = "resources";

/// Resolves the engine path from config, bundled resources and `PATH`.
#[derive(Debug, Clone)]
pub struct EngineLocator {
    explicit: Option<PathBuf>,
    resource_dirs: Vec<PathBuf>,
    search_path: bool,
    path_var: Option<OsString>,
}

impl EngineLocator {
    /// Builds a locator for the given engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        let resource_dirs = match &config.resource_dir {
            Some(dir) => vec![dir.clone()],
            None => default_resource_dirs(),
        };

        Self {
            explicit: config.path.clone(),
            resource_dirs,
            search_path: config.search_path,
            path_var: None,
        }
    }

    /// Uses `path_var` instead of the process `PATH` when searching.
    pub fn with_path_var(mut self, path_var: impl Into<OsString>) -> Self {
        self.path_var = Some(path_var.into());
        self
    }

    /// Finds the engine executable.
    ///
    /// An explicit path that does not point at a file is an error; it never
    /// falls through to the bundled or `PATH` lookups.
    pub fn locate(&self) -> Result<PathBuf, TranscodeError> {
        if let Some(explicit) = &self.explicit {
            return self.locate_explicit(explicit);
        }

        let name = executable_name(ENGINE_NAME);
        for dir in &self.resource_dirs {
            let candidate = dir.join(&name);
            if is_executable(&candidate) {
                debug!("Using bundled engine at {}", candidate.display());
                return Ok(candidate);
            }
        }

        if self.search_path {
            if let Some(found) = self.search(&name) {
                debug!("Using engine from PATH at {}", found.display());
                return Ok(found);
            }
        }

        Err(TranscodeError::engine_unavailable(format!(
            "{} not found in {}",
            ENGINE_NAME,
            if self.search_path {
                "the resource directories or PATH"
            } else {
                "the resource directories"
            }
        )))
    }

    fn locate_explicit(&self, explicit: &Path) -> Result<PathBuf, TranscodeError> {
        if is_bare_name(explicit) {
            let name = executable_name(&explicit.to_string_lossy());
            return self.search(&name).ok_or_else(|| {
                TranscodeError::engine_unavailable(format!(
                    "{} not found on PATH",
                    explicit.display()
                ))
            });
        }

        if is_executable(explicit) {
            Ok(explicit.to_path_buf())
        } else {
            Err(TranscodeError::engine_unavailable(format!(
                "configured engine {} is not an executable file",
                explicit.display()
            )))
        }
    }

    fn search(&self, name: &str) -> Option<PathBuf> {
        let path_var = match &self.path_var {
            Some(var) => var.clone(),
            None => std::env::var_os("PATH")?,
        };

        std::env::split_paths(&path_var)
            .map(|dir| dir.join(name))
            .find(|candidate| is_executable(candidate))
    }
}

fn default_resource_dirs() -> Vec<PathBuf> {
    match std::env::current_exe() {
        Ok(exe) => match exe.parent() {
            Some(dir) => vec![dir.to_path_buf(), dir.join(RESOURCES_SUBDIR)],
            None => Vec::new(),
        },
        Err(_) => Vec::new(),
    }
}

fn is_bare_name(path: &Path) -> bool {
    path.components().count() == 1 && path.parent().is_some_and(|p| p.as_os_str().is_empty())
}

fn executable_name(base: &str) -> String {
    let suffix = std::env::consts::EXE_SUFFIX;
    if suffix.is_empty() || base.ends_with(suffix) {
        base.to_string()
    } else {
        format!("{}{}", base, suffix)
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
