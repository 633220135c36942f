//! # Engine Error Taxonomy
//!
//! Every failure `perform_action` can return, as a typed result. None
//! of these leave a submission partially updated: the conditional write
//! is all-or-nothing, and every check runs before it.
//!
//! Results-integration failures are deliberately absent — they ride on
//! the *successful* REVIEW_RESULTS outcome as a report, because the
//! workflow transition commits independently of data propagation.

use thiserror::Error;

use crolink_core::SubmissionId;
use crolink_workflow::{SubmissionAction, SubmissionStatus};

/// Errors returned by the submission lifecycle engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The requested action has no transition table entry from the
    /// submission's current status. Recoverable: the caller corrects
    /// the request.
    #[error("action {action} is not legal from status {from}")]
    InvalidTransition {
        /// The submission's current status.
        from: SubmissionStatus,
        /// The requested action.
        action: SubmissionAction,
    },

    /// The actor lacks the role or organization match the operation
    /// declares. Not retryable without different credentials.
    #[error("forbidden: {reason}")]
    Forbidden {
        /// Why the permission check failed.
        reason: String,
    },

    /// A gating precondition does not hold (missing required documents,
    /// empty molecule set, missing results, unsigned documents).
    /// Recoverable after the caller remedies the condition.
    #[error("precondition failed: {reason}")]
    PreconditionFailed {
        /// What must be remedied.
        reason: String,
    },

    /// The submission changed between read and write. Recoverable: the
    /// caller re-reads and retries.
    #[error("conflict on {id}: expected version {expected}, found {actual}")]
    Conflict {
        /// The contested submission.
        id: SubmissionId,
        /// The version the write was conditioned on.
        expected: u64,
        /// The version actually found.
        actual: u64,
    },

    /// The action payload is malformed: wrong shape for the action,
    /// missing mandatory comment, zero turnaround, invalid draft data.
    #[error("validation error: {reason}")]
    Validation {
        /// What is malformed.
        reason: String,
    },

    /// No submission exists with the given identifier.
    #[error("submission {id} not found")]
    NotFound {
        /// The unknown identifier.
        id: SubmissionId,
    },

    /// A draft edit was attempted after the submission left DRAFT.
    #[error("submission in status {status} is not editable")]
    NotEditable {
        /// The submission's current status.
        status: SubmissionStatus,
    },

    /// The persistence layer itself is unusable. Operational, not a
    /// workflow outcome.
    #[error("internal error: {reason}")]
    Internal {
        /// What went wrong.
        reason: String,
    },
}

impl From<crolink_workflow::PayloadError> for EngineError {
    fn from(err: crolink_workflow::PayloadError) -> Self {
        Self::Validation {
            reason: err.to_string(),
        }
    }
}

impl From<crolink_workflow::PermissionError> for EngineError {
    fn from(err: crolink_workflow::PermissionError) -> Self {
        Self::Forbidden {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_offending_pair() {
        let err = EngineError::InvalidTransition {
            from: SubmissionStatus::Completed,
            action: SubmissionAction::Submit,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("SUBMIT"));
        assert!(rendered.contains("COMPLETED"));
    }

    #[test]
    fn test_conflict_carries_both_versions() {
        let err = EngineError::Conflict {
            id: SubmissionId::new(),
            expected: 3,
            actual: 4,
        };
        let rendered = err.to_string();
        assert!(rendered.contains('3'));
        assert!(rendered.contains('4'));
    }
}
