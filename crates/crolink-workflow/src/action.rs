//! # Workflow Actions and Payloads
//!
//! The nine actions a caller may request on a submission, and the typed
//! payload each action carries. Payloads follow the shape of the action:
//! pricing terms for PROVIDE_PRICING, a mandatory comment for REJECT and
//! CANCEL, the apply-to-molecules flag for REVIEW_RESULTS, and nothing
//! for the rest.
//!
//! `ActionPayload::validate_for` checks the pairing and the field-level
//! rules before the engine looks at anything else, so a malformed
//! request never reaches authorization or the transition table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crolink_core::Money;

/// An action requested against a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionAction {
    /// Sponsor submits the draft for CRO review.
    Submit,
    /// CRO quotes price and turnaround (or revises an existing quote).
    ProvidePricing,
    /// Sponsor accepts the quote.
    Approve,
    /// Either party declines the engagement.
    Reject,
    /// Either party withdraws the request before work begins.
    Cancel,
    /// CRO begins experimental work.
    StartExperiment,
    /// CRO registers delivered result data.
    UploadResults,
    /// Sponsor reviews the delivered results.
    ReviewResults,
    /// Either party signs the engagement off.
    Complete,
}

/// Every action. Used by affordance queries and exhaustive table sweeps.
pub const ALL_ACTIONS: [SubmissionAction; 9] = [
    SubmissionAction::Submit,
    SubmissionAction::ProvidePricing,
    SubmissionAction::Approve,
    SubmissionAction::Reject,
    SubmissionAction::Cancel,
    SubmissionAction::StartExperiment,
    SubmissionAction::UploadResults,
    SubmissionAction::ReviewResults,
    SubmissionAction::Complete,
];

impl std::fmt::Display for SubmissionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Submit => "SUBMIT",
            Self::ProvidePricing => "PROVIDE_PRICING",
            Self::Approve => "APPROVE",
            Self::Reject => "REJECT",
            Self::Cancel => "CANCEL",
            Self::StartExperiment => "START_EXPERIMENT",
            Self::UploadResults => "UPLOAD_RESULTS",
            Self::ReviewResults => "REVIEW_RESULTS",
            Self::Complete => "COMPLETE",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for SubmissionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUBMIT" => Ok(Self::Submit),
            "PROVIDE_PRICING" => Ok(Self::ProvidePricing),
            "APPROVE" => Ok(Self::Approve),
            "REJECT" => Ok(Self::Reject),
            "CANCEL" => Ok(Self::Cancel),
            "START_EXPERIMENT" => Ok(Self::StartExperiment),
            "UPLOAD_RESULTS" => Ok(Self::UploadResults),
            "REVIEW_RESULTS" => Ok(Self::ReviewResults),
            "COMPLETE" => Ok(Self::Complete),
            other => Err(format!("unknown submission action: {other:?}")),
        }
    }
}

// ─── Payloads ────────────────────────────────────────────────────────

/// The commercial terms quoted by a CRO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTerms {
    /// Quoted price. Strictly positive by construction of [`Money`].
    pub price: Money,
    /// Estimated working turnaround in days, at least one.
    pub estimated_turnaround_days: u32,
}

/// The payload accompanying an action request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPayload {
    /// No payload. Carried by SUBMIT, APPROVE, START_EXPERIMENT,
    /// UPLOAD_RESULTS, and COMPLETE.
    None,
    /// Pricing terms for PROVIDE_PRICING.
    Pricing(PricingTerms),
    /// Mandatory explanation for REJECT and CANCEL.
    Comment {
        /// Why the engagement is being declined or withdrawn.
        comment: String,
    },
    /// Review options for REVIEW_RESULTS.
    Review {
        /// Whether to propagate result values onto molecule records.
        apply_to_molecules: bool,
    },
}

/// Errors from structural payload validation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayloadError {
    /// The payload variant does not match the action.
    #[error("action {action} does not accept this payload")]
    WrongShape {
        /// The requested action.
        action: SubmissionAction,
    },

    /// REJECT and CANCEL require a non-blank comment.
    #[error("action {action} requires a comment")]
    MissingComment {
        /// The requested action.
        action: SubmissionAction,
    },

    /// Turnaround must be at least one day.
    #[error("estimated turnaround must be at least one day, got {days}")]
    InvalidTurnaround {
        /// The rejected value.
        days: u32,
    },
}

impl ActionPayload {
    /// Validate this payload against the action it accompanies.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload shape does not match the action,
    /// a mandatory comment is missing or blank, or the quoted turnaround
    /// is zero days.
    pub fn validate_for(&self, action: SubmissionAction) -> Result<(), PayloadError> {
        use SubmissionAction as A;
        match (action, self) {
            (A::ProvidePricing, Self::Pricing(terms)) => {
                if terms.estimated_turnaround_days == 0 {
                    return Err(PayloadError::InvalidTurnaround { days: 0 });
                }
                Ok(())
            }
            (A::Reject | A::Cancel, Self::Comment { comment }) => {
                if comment.trim().is_empty() {
                    return Err(PayloadError::MissingComment { action });
                }
                Ok(())
            }
            (A::ReviewResults, Self::Review { .. }) => Ok(()),
            // REVIEW_RESULTS without options defaults to no propagation.
            (A::ReviewResults, Self::None) => Ok(()),
            (
                A::Submit | A::Approve | A::StartExperiment | A::UploadResults | A::Complete,
                Self::None,
            ) => Ok(()),
            (A::Reject | A::Cancel, Self::None) => Err(PayloadError::MissingComment { action }),
            _ => Err(PayloadError::WrongShape { action }),
        }
    }

    /// The comment, if this payload carries one.
    pub fn comment(&self) -> Option<&str> {
        match self {
            Self::Comment { comment } => Some(comment),
            _ => None,
        }
    }

    /// The pricing terms, if this payload carries them.
    pub fn pricing(&self) -> Option<&PricingTerms> {
        match self {
            Self::Pricing(terms) => Some(terms),
            _ => None,
        }
    }

    /// Whether this payload requests results propagation onto molecules.
    pub fn apply_to_molecules(&self) -> bool {
        matches!(
            self,
            Self::Review {
                apply_to_molecules: true
            }
        )
    }
}
