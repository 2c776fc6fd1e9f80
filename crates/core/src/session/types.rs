//! Types for the session module.

use crate::transcoder::TranscodeRequest;

/// Busy flag of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    Converting { request: TranscodeRequest },
}

impl SessionStatus {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// What happened to a submitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The request is running in the background.
    Started { request_id: String },
    /// Another transcode was already running; the request was dropped.
    Ignored,
}

/// What happened to a dropped item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropDecision {
    /// A transcode started for the dropped file.
    Started { request_id: String },
    /// The session was busy; the drop was not looked at.
    Ignored,
    /// The destination chooser was dismissed.
    Cancelled,
}

impl From<Submission> for DropDecision {
    fn from(submission: Submission) -> Self {
        match submission {
            Submission::Started { request_id } => Self::Started { request_id },
            Submission::Ignored => Self::Ignored,
        }
    }
}
