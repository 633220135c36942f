//! # Submission Status
//!
//! The lifecycle states of a CRO service submission.
//!
//! ## States
//!
//! ```text
//! Draft ──▶ PendingReview ──▶ PricingProvided ──▶ Approved ──▶ InProgress
//!   │             │                  │  ▲            │             │
//!   │             │                  │  └─(re-quote) │             ▼
//!   │             ├──▶ Rejected ◀────┤               │      ResultsUploaded
//!   │             │    (terminal)    │               │             │
//!   └─────────────┴──▶ Cancelled ◀───┴───────────────┘             ▼
//!                      (terminal)                          ResultsReviewed
//!                                                                  │
//!                                                                  ▼
//!                                                              Completed
//!                                                              (terminal)
//! ```
//!
//! `Submitted` appears in the enum but is not a resting state: the
//! SUBMIT transition passes through it as an audit label on its way
//! from `Draft` to `PendingReview`. No transition table entry produces
//! it as a terminus, and `actions_from(Submitted)` is empty.

use serde::{Deserialize, Serialize};

/// The lifecycle status of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Sponsor is still assembling the request; fully editable.
    Draft,
    /// Audit label for the submit transition; never a resting state.
    Submitted,
    /// Awaiting CRO review and pricing.
    PendingReview,
    /// CRO has quoted price and turnaround.
    PricingProvided,
    /// Sponsor accepted the quote.
    Approved,
    /// Experimental work underway at the CRO.
    InProgress,
    /// CRO has delivered result data.
    ResultsUploaded,
    /// Sponsor has reviewed the delivered results.
    ResultsReviewed,
    /// Engagement signed off (terminal).
    Completed,
    /// Withdrawn before work began (terminal).
    Cancelled,
    /// Declined by either party (terminal).
    Rejected,
}

/// Every status, in lifecycle order. Used by exhaustive table sweeps.
pub const ALL_STATUSES: [SubmissionStatus; 11] = [
    SubmissionStatus::Draft,
    SubmissionStatus::Submitted,
    SubmissionStatus::PendingReview,
    SubmissionStatus::PricingProvided,
    SubmissionStatus::Approved,
    SubmissionStatus::InProgress,
    SubmissionStatus::ResultsUploaded,
    SubmissionStatus::ResultsReviewed,
    SubmissionStatus::Completed,
    SubmissionStatus::Cancelled,
    SubmissionStatus::Rejected,
];

impl SubmissionStatus {
    /// Whether this status is terminal (no further action is legal).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }

    /// Whether descriptive fields and the molecule set may still change.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Whether the engagement is still live.
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Submitted => "SUBMITTED",
            Self::PendingReview => "PENDING_REVIEW",
            Self::PricingProvided => "PRICING_PROVIDED",
            Self::Approved => "APPROVED",
            Self::InProgress => "IN_PROGRESS",
            Self::ResultsUploaded => "RESULTS_UPLOADED",
            Self::ResultsReviewed => "RESULTS_REVIEWED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "SUBMITTED" => Ok(Self::Submitted),
            "PENDING_REVIEW" => Ok(Self::PendingReview),
            "PRICING_PROVIDED" => Ok(Self::PricingProvided),
            "APPROVED" => Ok(Self::Approved),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "RESULTS_UPLOADED" => Ok(Self::ResultsUploaded),
            "RESULTS_REVIEWED" => Ok(Self::ResultsReviewed),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "REJECTED" => Ok(Self::Rejected),
            other => Err(format!("unknown submission status: {other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_classification() {
        let terminal = [
            SubmissionStatus::Completed,
            SubmissionStatus::Cancelled,
            SubmissionStatus::Rejected,
        ];
        for status in ALL_STATUSES {
            assert_eq!(status.is_terminal(), terminal.contains(&status));
        }
    }

    #[test]
    fn test_editable_iff_draft() {
        for status in ALL_STATUSES {
            assert_eq!(status.is_editable(), status == SubmissionStatus::Draft);
        }
    }

    #[test]
    fn test_active_iff_not_terminal() {
        for status in ALL_STATUSES {
            assert_eq!(status.is_active(), !status.is_terminal());
        }
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for status in ALL_STATUSES {
            let parsed: SubmissionStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert!("ARCHIVED".parse::<SubmissionStatus>().is_err());
        assert!("draft".parse::<SubmissionStatus>().is_err());
        assert!("".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_serde_uses_variant_names() {
        let json = serde_json::to_string(&SubmissionStatus::PendingReview).unwrap();
        assert_eq!(json, "\"PendingReview\"");
        let parsed: SubmissionStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SubmissionStatus::PendingReview);
    }

    #[test]
    fn test_all_statuses_distinct() {
        for (i, a) in ALL_STATUSES.iter().enumerate() {
            for b in &ALL_STATUSES[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
