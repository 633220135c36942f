//! # The Transition Table
//!
//! A pure lookup from `(current status, requested action)` to the
//! target status plus the declared list of effects the transition must
//! apply. The table carries no side effects of its own: effect
//! application, timestamps, and persistence belong to the engine.
//!
//! Declaring effects on the table entry instead of burying them in
//! handlers keeps the transition decision independently testable and
//! forces every new status or action through this single match — a
//! non-exhaustive arm is a compile error.
//!
//! ## Allowed Transitions
//!
//! ```text
//! SUBMIT            DRAFT            → PENDING_REVIEW    (+submitted_at)
//! PROVIDE_PRICING   PENDING_REVIEW   → PRICING_PROVIDED  (+pricing)
//! PROVIDE_PRICING   PRICING_PROVIDED → PRICING_PROVIDED  (re-quote)
//! APPROVE           PRICING_PROVIDED → APPROVED          (+approved_at)
//! REJECT            PENDING_REVIEW | PRICING_PROVIDED → REJECTED
//! CANCEL            DRAFT | PENDING_REVIEW | PRICING_PROVIDED | APPROVED → CANCELLED
//! START_EXPERIMENT  APPROVED         → IN_PROGRESS
//! UPLOAD_RESULTS    IN_PROGRESS      → RESULTS_UPLOADED
//! REVIEW_RESULTS    RESULTS_UPLOADED → RESULTS_REVIEWED
//! COMPLETE          RESULTS_REVIEWED → COMPLETED         (+completed_at)
//! ```
//!
//! CANCEL is deliberately absent from IN_PROGRESS onward: an experiment
//! already underway requires a recall process outside this workflow.

use serde::{Deserialize, Serialize};

use crate::action::{SubmissionAction, ALL_ACTIONS};
use crate::status::SubmissionStatus;

/// A field mutation a transition is declared to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Set `submitted_at` to the commit time. Set exactly once.
    RecordSubmittedAt,
    /// Set `approved_at` to the commit time. Set exactly once.
    RecordApprovedAt,
    /// Set `completed_at` to the commit time. Set exactly once.
    RecordCompletedAt,
    /// Replace all commercial fields together from the pricing payload
    /// and derive the estimated completion date.
    CapturePricing,
}

/// The resolved outcome of a legal `(status, action)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    /// The status the submission rests in after the transition.
    pub target: SubmissionStatus,
    /// Effects the engine must apply in the same conditional write.
    pub effects: &'static [Effect],
    /// Status recorded as an audit label en route to `target`, for
    /// transitions that pass through a non-resting status.
    pub via: Option<SubmissionStatus>,
}

/// Resolve a requested action against the current status.
///
/// Returns `None` when the pair is not in the table; the engine maps
/// that to an invalid-transition error. Pure and total — safe to call
/// from affordance queries and tests without any submission context.
pub fn resolve(status: SubmissionStatus, action: SubmissionAction) -> Option<TransitionSpec> {
    use SubmissionAction as A;
    use SubmissionStatus as S;

    let spec = match (status, action) {
        (S::Draft, A::Submit) => TransitionSpec {
            target: S::PendingReview,
            effects: &[Effect::RecordSubmittedAt],
            via: Some(S::Submitted),
        },
        (S::PendingReview | S::PricingProvided, A::ProvidePricing) => TransitionSpec {
            target: S::PricingProvided,
            effects: &[Effect::CapturePricing],
            via: None,
        },
        (S::PricingProvided, A::Approve) => TransitionSpec {
            target: S::Approved,
            effects: &[Effect::RecordApprovedAt],
            via: None,
        },
        (S::PendingReview | S::PricingProvided, A::Reject) => TransitionSpec {
            target: S::Rejected,
            effects: &[],
            via: None,
        },
        (S::Draft | S::PendingReview | S::PricingProvided | S::Approved, A::Cancel) => {
            TransitionSpec {
                target: S::Cancelled,
                effects: &[],
                via: None,
            }
        }
        (S::Approved, A::StartExperiment) => TransitionSpec {
            target: S::InProgress,
            effects: &[],
            via: None,
        },
        (S::InProgress, A::UploadResults) => TransitionSpec {
            target: S::ResultsUploaded,
            effects: &[],
            via: None,
        },
        (S::ResultsUploaded, A::ReviewResults) => TransitionSpec {
            target: S::ResultsReviewed,
            effects: &[],
            via: None,
        },
        (S::ResultsReviewed, A::Complete) => TransitionSpec {
            target: S::Completed,
            effects: &[Effect::RecordCompletedAt],
            via: None,
        },
        _ => return None,
    };
    Some(spec)
}

/// The actions with a table entry from the given status.
///
/// Affordance query for callers rendering available operations. Role
/// filtering is a separate concern layered on by the engine.
pub fn actions_from(status: SubmissionStatus) -> Vec<SubmissionAction> {
    ALL_ACTIONS
        .into_iter()
        .filter(|action| resolve(status, *action).is_some())
        .collect()
}
