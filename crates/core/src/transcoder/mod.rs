//! Transcoder module for extracting audio tracks from video files.
//!
//! This module provides the `Transcoder` trait and an implementation that
//! shells out to ffmpeg. The output format is chosen purely by the extension
//! of the destination path; the video stream is always discarded.
//!
//! # Example
//!
//! ```ignore
//! use audiorip_core::transcoder::{EngineConfig, FfmpegTranscoder, TranscodeRequest, Transcoder};
//!
//! let transcoder = FfmpegTranscoder::new(EngineConfig::default());
//!
//! // Fails with UnsupportedFormat before anything is spawned
//! assert!(TranscodeRequest::new("/videos/talk.mp4", "/music/talk.ogg").is_err());
//!
//! // Runs `ffmpeg -i /videos/talk.mp4 -vn -acodec flac /music/talk.flac`
//! let request = TranscodeRequest::new("/videos/talk.mp4", "/music/talk.flac")?;
//! let summary = transcoder.transcode(&request).await?;
//! println!("Wrote {} bytes", summary.output_size_bytes);
//! ```

mod codec;
mod config;
mod engine;
mod error;
mod ffmpeg;
mod traits;
mod types;

pub use codec::{resolve_codec, AudioFormat};
pub use config::EngineConfig;
pub use engine::{EngineLocator, ENGINE_NAME};
pub use error::{ErrorKind, TranscodeError};
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{TranscodeOutcome, TranscodeRequest, TranscodeResult, TranscodeSummary};
