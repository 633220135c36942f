//! # The Submission Aggregate
//!
//! A submission is one request from a sponsor to a CRO for a defined
//! service against a fixed molecule set. The aggregate owns its status,
//! its workflow timestamps, its commercial terms, and an ordered audit
//! trail of every committed transition.
//!
//! Field privacy is the enforcement mechanism for the core invariants:
//! `status` only moves through [`Submission::apply_transition`] with a
//! table-resolved spec, the molecule set and service only change through
//! the draft-gated patch method, and the version counter only advances
//! when a mutation commits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crolink_core::{ActorId, Money, MoleculeId, OrgId, ServiceId, SubmissionId, Timestamp};
use crolink_workflow::{
    ActionPayload, Effect, SubmissionAction, SubmissionParties, SubmissionStatus, TransitionSpec,
};

use crate::error::EngineError;

// ─── Audit Trail ─────────────────────────────────────────────────────

/// Record of one committed workflow transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Status before the transition.
    pub from_status: SubmissionStatus,
    /// Status the submission rests in after the transition.
    pub to_status: SubmissionStatus,
    /// Non-resting status passed through, recorded as an audit label
    /// (SUBMIT passes through `Submitted`).
    pub via: Option<SubmissionStatus>,
    /// The action that drove the transition.
    pub action: SubmissionAction,
    /// When the transition committed (UTC).
    pub timestamp: Timestamp,
    /// The actor who requested the action.
    pub actor: ActorId,
    /// The comment supplied with the action, where one was required.
    pub comment: Option<String>,
}

// ─── Draft Construction and Editing ──────────────────────────────────

/// The data a sponsor supplies to open a draft submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    /// Human-readable submission name.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// The requested CRO service.
    pub service_id: ServiceId,
    /// Molecules the work is requested against. Order is preserved;
    /// duplicates are dropped.
    pub molecule_ids: Vec<MoleculeId>,
    /// Opaque structured requirements blob.
    pub specifications: Option<Value>,
    /// Opaque structured metadata blob.
    pub metadata: Option<Value>,
}

/// A partial update to a draft submission. `None` fields are unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DraftPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement service.
    pub service_id: Option<ServiceId>,
    /// Replacement molecule set.
    pub molecule_ids: Option<Vec<MoleculeId>>,
    /// Replacement specifications blob.
    pub specifications: Option<Value>,
    /// Replacement metadata blob.
    pub metadata: Option<Value>,
}

// ─── The Aggregate ───────────────────────────────────────────────────

/// A CRO service submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    id: SubmissionId,
    name: String,
    description: Option<String>,
    specifications: Option<Value>,
    metadata: Option<Value>,
    service_id: ServiceId,
    molecule_ids: Vec<MoleculeId>,
    created_by: ActorId,
    sponsor_org: OrgId,
    status: SubmissionStatus,
    submitted_at: Option<Timestamp>,
    approved_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    price: Option<Money>,
    estimated_turnaround_days: Option<u32>,
    estimated_completion_date: Option<Timestamp>,
    created_at: Timestamp,
    version: u64,
    transitions: Vec<TransitionRecord>,
}

impl Submission {
    /// Open a new draft submission.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the name is blank.
    pub fn draft(
        request: DraftRequest,
        created_by: ActorId,
        sponsor_org: OrgId,
    ) -> Result<Self, EngineError> {
        if request.name.trim().is_empty() {
            return Err(EngineError::Validation {
                reason: "submission name must not be blank".to_string(),
            });
        }
        Ok(Self {
            id: SubmissionId::new(),
            name: request.name,
            description: request.description,
            specifications: request.specifications,
            metadata: request.metadata,
            service_id: request.service_id,
            molecule_ids: dedupe(request.molecule_ids),
            created_by,
            sponsor_org,
            status: SubmissionStatus::Draft,
            submitted_at: None,
            approved_at: None,
            completed_at: None,
            price: None,
            estimated_turnaround_days: None,
            estimated_completion_date: None,
            created_at: Timestamp::now(),
            version: 1,
            transitions: Vec::new(),
        })
    }

    // ── Identity and relationships ───────────────────────────────────

    /// The immutable submission identifier.
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Opaque requirements blob.
    pub fn specifications(&self) -> Option<&Value> {
        self.specifications.as_ref()
    }

    /// Opaque metadata blob.
    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// The requested CRO service.
    pub fn service_id(&self) -> ServiceId {
        self.service_id
    }

    /// The molecules the work is requested against, in order.
    pub fn molecule_ids(&self) -> &[MoleculeId] {
        &self.molecule_ids
    }

    /// Number of molecules in the set.
    pub fn molecule_count(&self) -> usize {
        self.molecule_ids.len()
    }

    /// The sponsor user who created the submission.
    pub fn created_by(&self) -> ActorId {
        self.created_by
    }

    /// The sponsor organization that owns the submission.
    pub fn sponsor_org(&self) -> OrgId {
        self.sponsor_org
    }

    /// The permission-check view of this submission's parties.
    pub fn parties(&self, provider_org: OrgId) -> SubmissionParties {
        SubmissionParties {
            created_by: self.created_by,
            sponsor_org: self.sponsor_org,
            provider_org,
        }
    }

    // ── Workflow state ───────────────────────────────────────────────

    /// Current lifecycle status.
    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    /// When the submission was submitted, once SUBMIT has committed.
    pub fn submitted_at(&self) -> Option<Timestamp> {
        self.submitted_at
    }

    /// When the quote was approved, once APPROVE has committed.
    pub fn approved_at(&self) -> Option<Timestamp> {
        self.approved_at
    }

    /// When the engagement completed, once COMPLETE has committed.
    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// The quoted price, once pricing has been provided.
    pub fn price(&self) -> Option<&Money> {
        self.price.as_ref()
    }

    /// The quoted turnaround in days, once pricing has been provided.
    pub fn estimated_turnaround_days(&self) -> Option<u32> {
        self.estimated_turnaround_days
    }

    /// The derived completion date, once pricing has been provided.
    pub fn estimated_completion_date(&self) -> Option<Timestamp> {
        self.estimated_completion_date
    }

    /// When the draft was opened.
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// The optimistic-concurrency token. Advances by one per committed
    /// mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The ordered audit trail of committed transitions.
    pub fn transitions(&self) -> &[TransitionRecord] {
        &self.transitions
    }

    /// Whether descriptive fields and the molecule set may still change.
    pub fn is_editable(&self) -> bool {
        self.status.is_editable()
    }

    /// Whether the engagement is still live.
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Apply a draft patch.
    ///
    /// # Errors
    ///
    /// Returns `NotEditable` unless the submission is in DRAFT, or a
    /// validation error for a blank replacement name or an empty
    /// replacement molecule set.
    pub fn apply_draft_patch(&mut self, patch: DraftPatch) -> Result<(), EngineError> {
        if !self.is_editable() {
            return Err(EngineError::NotEditable {
                status: self.status,
            });
        }
        if let Some(name) = patch.name {
            if name.trim().is_empty() {
                return Err(EngineError::Validation {
                    reason: "submission name must not be blank".to_string(),
                });
            }
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(service_id) = patch.service_id {
            self.service_id = service_id;
        }
        if let Some(molecule_ids) = patch.molecule_ids {
            self.molecule_ids = dedupe(molecule_ids);
        }
        if let Some(specifications) = patch.specifications {
            self.specifications = Some(specifications);
        }
        if let Some(metadata) = patch.metadata {
            self.metadata = Some(metadata);
        }
        self.version += 1;
        Ok(())
    }

    /// Apply a table-resolved transition: declared effects, status move,
    /// audit record, version bump. The caller (the engine) has already
    /// validated the payload, authorized the actor, and checked gates.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a `CapturePricing` effect is
    /// declared but the payload carries no pricing terms.
    pub(crate) fn apply_transition(
        &mut self,
        action: SubmissionAction,
        actor: ActorId,
        spec: &TransitionSpec,
        payload: &ActionPayload,
        now: Timestamp,
    ) -> Result<(), EngineError> {
        for effect in spec.effects {
            match effect {
                Effect::RecordSubmittedAt => {
                    self.submitted_at.get_or_insert(now);
                }
                Effect::RecordApprovedAt => {
                    self.approved_at.get_or_insert(now);
                }
                Effect::RecordCompletedAt => {
                    self.completed_at.get_or_insert(now);
                }
                Effect::CapturePricing => {
                    let terms = payload.pricing().ok_or_else(|| EngineError::Validation {
                        reason: format!("action {action} requires pricing terms"),
                    })?;
                    self.price = Some(terms.price.clone());
                    self.estimated_turnaround_days = Some(terms.estimated_turnaround_days);
                    self.estimated_completion_date =
                        Some(now.plus_days(terms.estimated_turnaround_days));
                }
            }
        }

        self.transitions.push(TransitionRecord {
            from_status: self.status,
            to_status: spec.target,
            via: spec.via,
            action,
            timestamp: now,
            actor,
            comment: payload.comment().map(str::to_string),
        });
        self.status = spec.target;
        self.version += 1;
        Ok(())
    }
}

/// Drop duplicate molecule ids, preserving first-occurrence order.
fn dedupe(ids: Vec<MoleculeId>) -> Vec<MoleculeId> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crolink_workflow::resolve;

    fn request() -> DraftRequest {
        DraftRequest {
            name: "Kinase panel batch 7".to_string(),
            description: None,
            service_id: ServiceId::new(),
            molecule_ids: vec![MoleculeId::new(), MoleculeId::new()],
            specifications: None,
            metadata: None,
        }
    }

    fn draft() -> Submission {
        Submission::draft(request(), ActorId::new(), OrgId::new()).unwrap()
    }

    #[test]
    fn test_draft_starts_editable_at_version_one() {
        let s = draft();
        assert_eq!(s.status(), SubmissionStatus::Draft);
        assert_eq!(s.version(), 1);
        assert!(s.is_editable());
        assert!(s.is_active());
        assert!(s.transitions().is_empty());
        assert_eq!(s.molecule_count(), 2);
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut r = request();
        r.name = "  ".to_string();
        assert!(Submission::draft(r, ActorId::new(), OrgId::new()).is_err());
    }

    #[test]
    fn test_molecule_set_deduplicated_in_order() {
        let a = MoleculeId::new();
        let b = MoleculeId::new();
        let mut r = request();
        r.molecule_ids = vec![a, b, a, b, a];
        let s = Submission::draft(r, ActorId::new(), OrgId::new()).unwrap();
        assert_eq!(s.molecule_ids(), &[a, b]);
    }

    #[test]
    fn test_draft_patch_bumps_version() {
        let mut s = draft();
        let patch = DraftPatch {
            name: Some("Kinase panel batch 8".to_string()),
            ..DraftPatch::default()
        };
        s.apply_draft_patch(patch).unwrap();
        assert_eq!(s.name(), "Kinase panel batch 8");
        assert_eq!(s.version(), 2);
    }

    #[test]
    fn test_patch_rejected_after_leaving_draft() {
        let mut s = draft();
        let spec = resolve(SubmissionStatus::Draft, SubmissionAction::Submit).unwrap();
        s.apply_transition(
            SubmissionAction::Submit,
            ActorId::new(),
            &spec,
            &ActionPayload::None,
            Timestamp::now(),
        )
        .unwrap();

        let result = s.apply_draft_patch(DraftPatch {
            name: Some("too late".to_string()),
            ..DraftPatch::default()
        });
        assert!(matches!(result, Err(EngineError::NotEditable { .. })));
    }

    #[test]
    fn test_submit_transition_records_label_and_timestamp() {
        let mut s = draft();
        let actor = ActorId::new();
        let spec = resolve(SubmissionStatus::Draft, SubmissionAction::Submit).unwrap();
        s.apply_transition(
            SubmissionAction::Submit,
            actor,
            &spec,
            &ActionPayload::None,
            Timestamp::now(),
        )
        .unwrap();

        assert_eq!(s.status(), SubmissionStatus::PendingReview);
        assert!(s.submitted_at().is_some());
        assert_eq!(s.version(), 2);
        assert_eq!(s.transitions().len(), 1);

        let record = &s.transitions()[0];
        assert_eq!(record.from_status, SubmissionStatus::Draft);
        assert_eq!(record.to_status, SubmissionStatus::PendingReview);
        assert_eq!(record.via, Some(SubmissionStatus::Submitted));
        assert_eq!(record.actor, actor);
    }

    #[test]
    fn test_capture_pricing_requires_terms() {
        let mut s = draft();
        let submit = resolve(SubmissionStatus::Draft, SubmissionAction::Submit).unwrap();
        s.apply_transition(
            SubmissionAction::Submit,
            ActorId::new(),
            &submit,
            &ActionPayload::None,
            Timestamp::now(),
        )
        .unwrap();

        let pricing = resolve(
            SubmissionStatus::PendingReview,
            SubmissionAction::ProvidePricing,
        )
        .unwrap();
        let result = s.apply_transition(
            SubmissionAction::ProvidePricing,
            ActorId::new(),
            &pricing,
            &ActionPayload::None,
            Timestamp::now(),
        );
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_serde_roundtrip_preserves_private_state() {
        let s = draft();
        let json = serde_json::to_string(&s).unwrap();
        let parsed: Submission = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id(), s.id());
        assert_eq!(parsed.status(), s.status());
        assert_eq!(parsed.version(), s.version());
        assert_eq!(parsed.molecule_ids(), s.molecule_ids());
    }
}
