//! Trait definitions for the transcoder module.

use async_trait::async_trait;

use super::codec::AudioFormat;
use super::error::TranscodeError;
use super::types::{TranscodeRequest, TranscodeSummary};

/// Something that can extract the audio track of a video into a new file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Runs one request to completion.
    ///
    /// Resolves only once the underlying engine has exited.
    async fn transcode(&self, request: &TranscodeRequest)
        -> Result<TranscodeSummary, TranscodeError>;

    /// Validates that the transcoder is properly configured and ready.
    async fn validate(&self) -> Result<(), TranscodeError>;

    /// Returns the output formats this transcoder can write.
    fn supported_output_formats(&self) -> &[AudioFormat] {
        &AudioFormat::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTranscoder;

    #[async_trait]
    impl Transcoder for EchoTranscoder {
        fn name(&self) -> &str {
            "echo"
        }

        async fn transcode(
            &self,
            _request: &TranscodeRequest,
        ) -> Result<TranscodeSummary, TranscodeError> {
            Ok(TranscodeSummary {
                output_size_bytes: 0,
                duration_ms: 0,
            })
        }

        async fn validate(&self) -> Result<(), TranscodeError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_transcode_through_trait_object() {
        let transcoder: Box<dyn Transcoder> = Box::new(EchoTranscoder);
        let request = TranscodeRequest::new("/in.mov", "/out.m4a").unwrap();
        let summary = transcoder.transcode(&request).await.unwrap();
        assert_eq!(summary.output_size_bytes, 0);
        assert_eq!(transcoder.name(), "echo");
    }

    #[test]
    fn test_supported_formats() {
        let formats = EchoTranscoder.supported_output_formats();
        assert_eq!(formats.len(), 6);
        assert!(formats.contains(&AudioFormat::Wma));
    }
}
