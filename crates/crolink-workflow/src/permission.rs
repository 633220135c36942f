//! # Role and Organization Permission Check
//!
//! Each workflow action declares which roles may request it and which
//! organization the actor must belong to. Sponsor-side roles act for
//! the organization that created the submission; CRO-side roles act for
//! the organization providing the service. Actions open to "either
//! party's admin" resolve the expected organization from the side of
//! the actor's role.
//!
//! The check fails closed: a role outside the declared set, or an
//! organization mismatch, is rejected. SUBMIT and APPROVE additionally
//! restrict sponsor scientists to the submission's creator — a
//! scientist cannot submit or approve a colleague's request, but a
//! sponsor admin can.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crolink_core::{ActorId, OrgId};

use crate::action::SubmissionAction;

/// A platform role, scoped to one side of the engagement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Sponsor-side administrator.
    SponsorAdmin,
    /// Sponsor-side scientist.
    SponsorScientist,
    /// CRO-side administrator.
    CroAdmin,
    /// CRO-side lab technician.
    CroTechnician,
}

impl Role {
    /// Whether this role acts for the sponsor organization.
    pub fn is_sponsor_side(&self) -> bool {
        matches!(self, Self::SponsorAdmin | Self::SponsorScientist)
    }

    /// Whether this role acts for the CRO organization.
    pub fn is_cro_side(&self) -> bool {
        !self.is_sponsor_side()
    }

    /// Whether this role carries administrative authority for its side.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::SponsorAdmin | Self::CroAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::SponsorAdmin => "SPONSOR_ADMIN",
            Self::SponsorScientist => "SPONSOR_SCIENTIST",
            Self::CroAdmin => "CRO_ADMIN",
            Self::CroTechnician => "CRO_TECHNICIAN",
        };
        f.write_str(s)
    }
}

/// The identity a caller presents with an action request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The acting user.
    pub id: ActorId,
    /// The actor's role.
    pub role: Role,
    /// The organization the actor belongs to.
    pub organization: OrgId,
}

/// The parties to a submission, as the permission check sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionParties {
    /// The user who created the submission.
    pub created_by: ActorId,
    /// The sponsor organization that owns the submission.
    pub sponsor_org: OrgId,
    /// The CRO organization providing the requested service.
    pub provider_org: OrgId,
}

/// Which organization an action's actor must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrgScope {
    /// The sponsor organization that created the submission.
    Sponsor,
    /// The CRO organization providing the service.
    Provider,
    /// Either party, matched by the side of the actor's role.
    EitherParty,
}

/// The declared policy for one action.
#[derive(Debug, Clone, Copy)]
struct ActionPolicy {
    roles: &'static [Role],
    scope: OrgScope,
    /// Non-admin sponsor roles must additionally be the creator.
    creator_bound: bool,
}

fn policy_for(action: SubmissionAction) -> ActionPolicy {
    use Role as R;
    use SubmissionAction as A;
    match action {
        A::Submit | A::Approve => ActionPolicy {
            roles: &[R::SponsorAdmin, R::SponsorScientist],
            scope: OrgScope::Sponsor,
            creator_bound: true,
        },
        A::ProvidePricing => ActionPolicy {
            roles: &[R::CroAdmin],
            scope: OrgScope::Provider,
            creator_bound: false,
        },
        A::Reject | A::Cancel | A::Complete => ActionPolicy {
            roles: &[R::SponsorAdmin, R::CroAdmin],
            scope: OrgScope::EitherParty,
            creator_bound: false,
        },
        A::StartExperiment | A::UploadResults => ActionPolicy {
            roles: &[R::CroAdmin, R::CroTechnician],
            scope: OrgScope::Provider,
            creator_bound: false,
        },
        A::ReviewResults => ActionPolicy {
            roles: &[R::SponsorAdmin, R::SponsorScientist],
            scope: OrgScope::Sponsor,
            creator_bound: false,
        },
    }
}

/// Errors from the permission check.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PermissionError {
    /// The actor may not perform the action on this submission.
    #[error("actor {actor} may not perform {action}: {reason}")]
    Forbidden {
        /// The acting user.
        actor: ActorId,
        /// The requested action.
        action: SubmissionAction,
        /// Why the check failed.
        reason: String,
    },
}

/// Decide whether `actor` may request `action` on a submission with the
/// given parties.
///
/// # Errors
///
/// Returns `Forbidden` when the role is outside the action's declared
/// set, the actor's organization does not match the expected party, or
/// a creator-bound action is requested by a non-creator scientist.
pub fn authorize(
    action: SubmissionAction,
    actor: &Actor,
    parties: &SubmissionParties,
) -> Result<(), PermissionError> {
    let policy = policy_for(action);
    let forbid = |reason: String| PermissionError::Forbidden {
        actor: actor.id,
        action,
        reason,
    };

    if !policy.roles.contains(&actor.role) {
        return Err(forbid(format!("role {} not permitted", actor.role)));
    }

    let expected_org = match policy.scope {
        OrgScope::Sponsor => parties.sponsor_org,
        OrgScope::Provider => parties.provider_org,
        OrgScope::EitherParty => {
            if actor.role.is_sponsor_side() {
                parties.sponsor_org
            } else {
                parties.provider_org
            }
        }
    };
    if actor.organization != expected_org {
        return Err(forbid("organization does not match".to_string()));
    }

    if policy.creator_bound && !actor.role.is_admin() && actor.id != parties.created_by {
        return Err(forbid("only the creator or a sponsor admin may act".to_string()));
    }

    Ok(())
}
