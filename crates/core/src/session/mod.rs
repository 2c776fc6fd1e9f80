//! Session state owner.
//!
//! A `Session` holds the single busy flag that gates transcoding. Work runs in
//! a spawned tokio task; its result travels back over a oneshot channel and is
//! applied by the session itself, so session state has exactly one writer.
//!
//! # Example
//!
//! ```ignore
//! use audiorip_core::session::{DropItem, FixedDestination, Session};
//! use audiorip_core::transcoder::FfmpegTranscoder;
//!
//! let mut session = Session::new(FfmpegTranscoder::with_defaults());
//! let decision = session.on_file_dropped(
//!     &DropItem::file_url("file:///videos/talk.mp4"),
//!     &FixedDestination("/music/talk.mp3".into()),
//! )?;
//!
//! if let Some(result) = session.wait_for_completion().await {
//!     println!("succeeded: {}", result.succeeded());
//! }
//! ```

mod chooser;
mod input;
mod types;

pub use chooser::{DerivedDestination, DestinationChooser, FixedDestination};
pub use input::{resolve_drop, resolve_drops, suggested_name, DropItem, DropPayload, FILE_URL_TYPE};
pub use types::{DropDecision, SessionStatus, Submission};

use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::transcoder::{TranscodeError, TranscodeRequest, TranscodeResult, Transcoder};

/// Owns the busy flag and the last result shown to the user.
pub struct Session<T: Transcoder + 'static> {
    transcoder: Arc<T>,
    status: SessionStatus,
    last_result: Option<TranscodeResult>,
    pending: Option<oneshot::Receiver<TranscodeResult>>,
}

impl<T: Transcoder + 'static> Session<T> {
    /// Creates an idle session around `transcoder`.
    pub fn new(transcoder: T) -> Self {
        Self::from_arc(Arc::new(transcoder))
    }

    /// Creates an idle session around a shared transcoder.
    pub fn from_arc(transcoder: Arc<T>) -> Self {
        Self {
            transcoder,
            status: SessionStatus::Idle,
            last_result: None,
            pending: None,
        }
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        !self.status.is_idle()
    }

    /// Result of the most recently finished transcode, success or failure.
    pub fn last_result(&self) -> Option<&TranscodeResult> {
        self.last_result.as_ref()
    }

    /// Starts `request` in the background unless a transcode is running.
    ///
    /// Must be called from within a tokio runtime. The status flips to
    /// `Converting` before the task is spawned.
    pub fn submit(&mut self, request: TranscodeRequest) -> Submission {
        if let SessionStatus::Converting { request: running } = &self.status {
            debug!(
                "Ignoring request for {}: {} is still converting",
                request.source().display(),
                running.source().display()
            );
            return Submission::Ignored;
        }

        let request_id = request.id().to_string();
        self.status = SessionStatus::Converting {
            request: request.clone(),
        };

        let (tx, rx) = oneshot::channel();
        self.pending = Some(rx);

        let transcoder = Arc::clone(&self.transcoder);
        tokio::spawn(async move {
            let run = transcoder.transcode(&request).await;
            let _ = tx.send(TranscodeResult::from_run(&request, run));
        });

        Submission::Started { request_id }
    }

    /// Handles one dropped item: resolve it, ask for a destination, submit.
    ///
    /// A busy session ignores the drop without consulting `chooser`. Errors are
    /// returned before anything is spawned and leave the session idle.
    pub fn on_file_dropped<C>(
        &mut self,
        item: &DropItem,
        chooser: &C,
    ) -> Result<DropDecision, TranscodeError>
    where
        C: DestinationChooser + ?Sized,
    {
        if self.is_busy() {
            debug!("Ignoring drop of {} while converting", item.payload);
            return Ok(DropDecision::Ignored);
        }

        let source = resolve_drop(item)?;
        let Some(destination) = chooser.choose_destination(&suggested_name(&source)) else {
            debug!("Destination choice cancelled for {}", source.display());
            return Ok(DropDecision::Cancelled);
        };

        let request = TranscodeRequest::new(source, destination)?;
        Ok(self.submit(request).into())
    }

    /// Waits for the running transcode and applies its result.
    ///
    /// Returns `None` right away when the session is idle.
    pub async fn wait_for_completion(&mut self) -> Option<TranscodeResult> {
        let rx = self.pending.take()?;
        let result = match rx.await {
            Ok(result) => result,
            Err(_) => self.lost_result()?,
        };
        Some(self.apply(result))
    }

    /// Applies a finished result without waiting, for frame-driven front ends.
    pub fn try_complete(&mut self) -> Option<TranscodeResult> {
        let rx = self.pending.as_mut()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => self.lost_result()?,
        };
        self.pending = None;
        Some(self.apply(result))
    }

    // The background task ended without reporting, which only happens if the
    // transcoder panicked.
    fn lost_result(&self) -> Option<TranscodeResult> {
        match &self.status {
            SessionStatus::Converting { request } => Some(TranscodeResult::from_run(
                request,
                Err(TranscodeError::transcode_failed(
                    "transcode task ended without a result",
                    None,
                )),
            )),
            SessionStatus::Idle => None,
        }
    }

    fn apply(&mut self, result: TranscodeResult) -> TranscodeResult {
        match result.failure_reason() {
            None => info!(
                "Saved to {} ({})",
                result.destination.display(),
                result.request_id
            ),
            Some(reason) => warn!(
                "Extraction from {} failed: {}",
                result.source.display(),
                reason
            ),
        }

        self.status = SessionStatus::Idle;
        self.pending = None;
        self.last_result = Some(result.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTranscoder;
    use crate::transcoder::ErrorKind;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn source_file(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"video").unwrap();
        path
    }

    #[tokio::test]
    async fn test_new_session_is_idle() {
        let mut session = Session::new(MockTranscoder::new());
        assert!(!session.is_busy());
        assert!(session.last_result().is_none());
        assert!(session.wait_for_completion().await.is_none());
        assert!(session.try_complete().is_none());
    }

    #[tokio::test]
    async fn test_submit_then_complete() {
        let transcoder = MockTranscoder::new();
        let mut session = Session::new(transcoder.clone());
        let request = TranscodeRequest::new("/videos/talk.mp4", "/music/talk.flac").unwrap();

        let submission = session.submit(request.clone());
        assert_eq!(
            submission,
            Submission::Started {
                request_id: request.id().to_string()
            }
        );
        assert!(session.is_busy());

        let result = session.wait_for_completion().await.unwrap();
        assert!(result.succeeded());
        assert_eq!(result.request_id, request.id());
        assert!(!session.is_busy());
        assert_eq!(session.last_result(), Some(&result));
        assert_eq!(transcoder.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_failure_is_recorded_and_session_returns_idle() {
        let transcoder = MockTranscoder::new();
        transcoder
            .set_next_error(TranscodeError::transcode_failed("ffmpeg exited with code 1", None))
            .await;
        let mut session = Session::new(transcoder);

        session.submit(TranscodeRequest::new("/in.mov", "/out.mp3").unwrap());
        let result = session.wait_for_completion().await.unwrap();

        assert!(!result.succeeded());
        assert_eq!(result.failure_kind(), Some(ErrorKind::TranscodeFailed));
        assert!(session.status().is_idle());
        assert!(!session.last_result().unwrap().succeeded());
    }

    #[tokio::test]
    async fn test_try_complete_while_gated() {
        let transcoder = MockTranscoder::gated();
        let mut session = Session::new(transcoder.clone());

        session.submit(TranscodeRequest::new("/in.mov", "/out.wav").unwrap());
        assert!(transcoder.wait_for_requests(1).await);
        assert!(session.try_complete().is_none());
        assert!(session.is_busy());

        transcoder.release();
        let result = session.wait_for_completion().await.unwrap();
        assert!(result.succeeded());
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_drop_unsupported_extension_spawns_nothing() {
        let dir = TempDir::new().unwrap();
        let source = source_file(&dir, "talk.mp4");
        let transcoder = MockTranscoder::new();
        let mut session = Session::new(transcoder.clone());

        let err = session
            .on_file_dropped(
                &DropItem::from_path(&source),
                &FixedDestination(dir.path().join("talk.ogg")),
            )
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UnsupportedFormat);
        assert!(!session.is_busy());
        assert_eq!(transcoder.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_drop_invalid_item() {
        let transcoder = MockTranscoder::new();
        let mut session = Session::new(transcoder.clone());

        let err = session
            .on_file_dropped(
                &DropItem::from_path("/nonexistent/talk.mp4"),
                &FixedDestination(PathBuf::from("/music/talk.mp3")),
            )
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidDrop);
        assert_eq!(transcoder.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_drop_cancelled() {
        let dir = TempDir::new().unwrap();
        let source = source_file(&dir, "talk.mp4");
        let mut session = Session::new(MockTranscoder::new());

        let decision = session
            .on_file_dropped(&DropItem::from_path(&source), &|_: &str| -> Option<PathBuf> { None })
            .unwrap();

        assert_eq!(decision, DropDecision::Cancelled);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_drop_uses_suggested_name() {
        let dir = TempDir::new().unwrap();
        let source = source_file(&dir, "holiday.mov");
        let transcoder = MockTranscoder::new();
        let mut session = Session::new(transcoder.clone());

        let chooser = DerivedDestination::new(dir.path(), crate::transcoder::AudioFormat::M4a);
        let decision = session
            .on_file_dropped(&DropItem::from_path(&source), &chooser)
            .unwrap();
        assert!(matches!(decision, DropDecision::Started { .. }));

        let result = session.wait_for_completion().await.unwrap();
        assert_eq!(result.destination, dir.path().join("holiday.m4a"));
        assert_eq!(result.source, source);
    }
}
