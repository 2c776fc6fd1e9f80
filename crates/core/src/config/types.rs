use serde::{Deserialize, Serialize};

pub use crate::transcoder::EngineConfig;
use crate::transcoder::AudioFormat;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Format used when no destination file is given
    #[serde(default = "default_format")]
    pub default_format: AudioFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
        }
    }
}

fn default_format() -> AudioFormat {
    AudioFormat::M4a
}
