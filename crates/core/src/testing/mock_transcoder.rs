//! Mock transcoder for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};

use crate::transcoder::{TranscodeError, TranscodeRequest, TranscodeSummary, Transcoder};

/// How long `wait_for_requests` polls before giving up.
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Mock implementation of the Transcoder trait.
///
/// Provides controllable behavior for testing:
/// - Track transcode requests for assertions
/// - Simulate failures
/// - Hold each run open until the test releases it
///
/// # Example
///
/// ```rust,ignore
/// use audiorip_core::testing::MockTranscoder;
///
/// let transcoder = MockTranscoder::gated();
/// let mut session = Session::new(transcoder.clone());
///
/// session.submit(request);
/// assert!(transcoder.wait_for_requests(1).await);
///
/// // Let the run finish
/// transcoder.release();
/// session.wait_for_completion().await;
/// ```
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    /// Requests in the order runs started.
    requests: Arc<RwLock<Vec<TranscodeRequest>>>,
    /// If set, the next run will fail with this error.
    next_error: Arc<RwLock<Option<TranscodeError>>>,
    /// When present, every run waits for a permit before finishing.
    gate: Option<Arc<Semaphore>>,
    /// Reported output size for successful runs.
    output_size_bytes: u64,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    /// Create a mock whose runs finish immediately.
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            gate: None,
            output_size_bytes: 4096,
        }
    }

    /// Create a mock whose runs block until [`MockTranscoder::release`].
    pub fn gated() -> Self {
        Self {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Self::new()
        }
    }

    /// Let one blocked (or future) run finish.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Get all recorded requests.
    pub async fn recorded_requests(&self) -> Vec<TranscodeRequest> {
        self.requests.read().await.clone()
    }

    /// Get the number of runs started.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Wait until at least `count` runs have started.
    ///
    /// Returns false if that does not happen within a few seconds.
    pub async fn wait_for_requests(&self, count: usize) -> bool {
        let poll = async {
            while self.request_count().await < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(WAIT_TIMEOUT, poll).await.is_ok()
    }

    /// Configure the next run to fail with the given error.
    pub async fn set_next_error(&self, error: TranscodeError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn transcode(
        &self,
        request: &TranscodeRequest,
    ) -> Result<TranscodeSummary, TranscodeError> {
        self.requests.write().await.push(request.clone());

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| TranscodeError::transcode_failed("mock gate closed", None))?
                .forget();
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(TranscodeSummary {
            output_size_bytes: self.output_size_bytes,
            duration_ms: 1,
        })
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcoder::ErrorKind;

    #[tokio::test]
    async fn test_records_requests() {
        let transcoder = MockTranscoder::new();
        let request = TranscodeRequest::new("/in.mov", "/out.mp3").unwrap();

        transcoder.transcode(&request).await.unwrap();

        let recorded = transcoder.recorded_requests().await;
        assert_eq!(recorded, vec![request]);
    }

    #[tokio::test]
    async fn test_next_error_is_consumed() {
        let transcoder = MockTranscoder::new();
        transcoder
            .set_next_error(TranscodeError::engine_unavailable("missing"))
            .await;
        let request = TranscodeRequest::new("/in.mov", "/out.mp3").unwrap();

        let err = transcoder.transcode(&request).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EngineUnavailable);
        assert!(transcoder.transcode(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_gate_blocks_until_released() {
        let transcoder = MockTranscoder::gated();
        let request = TranscodeRequest::new("/in.mov", "/out.mp3").unwrap();

        let run = {
            let transcoder = transcoder.clone();
            tokio::spawn(async move { transcoder.transcode(&request).await })
        };

        assert!(transcoder.wait_for_requests(1).await);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!run.is_finished());

        transcoder.release();
        assert!(run.await.unwrap().is_ok());
    }
}
