//! Destination choice, the save-dialog side of a drop.

use std::path::{Path, PathBuf};

use crate::transcoder::AudioFormat;

/// Picks where the extracted audio should be written.
///
/// A GUI front end shows a save dialog here; returning `None` means the user
/// cancelled and nothing is transcoded.
pub trait DestinationChooser {
    fn choose_destination(&self, suggested_name: &str) -> Option<PathBuf>;
}

impl<F> DestinationChooser for F
where
    F: Fn(&str) -> Option<PathBuf>,
{
    fn choose_destination(&self, suggested_name: &str) -> Option<PathBuf> {
        self(suggested_name)
    }
}

/// Always answers with the same path.
#[derive(Debug, Clone)]
pub struct FixedDestination(pub PathBuf);

impl DestinationChooser for FixedDestination {
    fn choose_destination(&self, _suggested_name: &str) -> Option<PathBuf> {
        Some(self.0.clone())
    }
}

/// Writes `<dir>/<suggested name>.<format extension>`.
#[derive(Debug, Clone)]
pub struct DerivedDestination {
    dir: PathBuf,
    format: AudioFormat,
}

impl DerivedDestination {
    pub fn new(dir: impl Into<PathBuf>, format: AudioFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    /// Places output next to `source`.
    pub fn beside(source: &Path, format: AudioFormat) -> Self {
        let dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(dir, format)
    }
}

impl DestinationChooser for DerivedDestination {
    fn choose_destination(&self, suggested_name: &str) -> Option<PathBuf> {
        Some(
            self.dir
                .join(format!("{}.{}", suggested_name, self.format.extension())),
        )
    }
}
