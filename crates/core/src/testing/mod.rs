//! Testing utilities and mock implementations.
//!
//! Lets session and front-end tests run without a real ffmpeg.
//!
//! # Example
//!
//! ```rust,ignore
//! use audiorip_core::testing::MockTranscoder;
//!
//! let transcoder = MockTranscoder::new();
//! transcoder.set_next_error(TranscodeError::transcode_failed("boom", None)).await;
//! ```

mod mock_transcoder;

pub use mock_transcoder::MockTranscoder;
