//! # The Submission Lifecycle Engine
//!
//! Orchestrates every mutation of a submission. An action request runs
//! through a fixed pipeline:
//!
//! 1. structural payload validation,
//! 2. permission check against the declared role/organization policy,
//! 3. transition table lookup,
//! 4. action-specific gates (molecule set, document gate, results
//!    presence, signature completion),
//! 5. conditional write of the mutated aggregate,
//! 6. post-commit side effects: notification events and, for
//!    REVIEW_RESULTS with propagation requested, results integration.
//!
//! The table is consulted before the gates so that an illegal
//! `(status, action)` pair always reports `InvalidTransition`,
//! whatever state the documents or results are in. The permission
//! check runs before the table so an unauthorized caller learns
//! nothing about the submission's position in the workflow.
//!
//! Everything before the conditional write is read-only; everything
//! after it is outside the transactional boundary and must be safe to
//! repeat (events are fire-and-forget, integration is idempotent
//! per row).

use std::sync::Arc;

use crolink_core::{SubmissionId, Timestamp};
use crolink_workflow::{
    actions_from, authorize, evaluate_gate, resolve, ActionPayload, Actor, CroService,
    DocumentRequirements, SubmissionAction,
};

use crate::collaborators::{
    DocumentDirectory, MoleculeDirectory, NotificationSink, ResultSource, ServiceCatalog,
    WorkflowEvent,
};
use crate::error::EngineError;
use crate::integration::{apply_results, IntegrationReport};
use crate::store::{StoreError, SubmissionStore};
use crate::submission::{DraftPatch, DraftRequest, Submission};

/// An action request, as the external CRUD layer hands it over.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    /// The requested workflow action.
    pub action: SubmissionAction,
    /// The identity the caller presents.
    pub actor: Actor,
    /// The payload accompanying the action.
    pub payload: ActionPayload,
}

/// The result of a successfully applied action.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    /// The submission after the transition committed.
    pub submission: Submission,
    /// Events emitted to the notification dispatcher.
    pub events: Vec<WorkflowEvent>,
    /// The results-integration report, when REVIEW_RESULTS requested
    /// propagation. Partial failures live here, not in the error
    /// channel — the transition has already committed.
    pub integration: Option<IntegrationReport>,
}

/// The submission lifecycle engine.
///
/// Generic over the store; collaborators are dynamic because an
/// embedding wires them once at startup.
pub struct SubmissionEngine<S: SubmissionStore> {
    store: S,
    services: Arc<dyn ServiceCatalog>,
    documents: Arc<dyn DocumentDirectory>,
    results: Arc<dyn ResultSource>,
    molecules: Arc<dyn MoleculeDirectory>,
    notifications: Arc<dyn NotificationSink>,
}

impl<S: SubmissionStore> SubmissionEngine<S> {
    /// Wire an engine to its store and collaborators.
    pub fn new(
        store: S,
        services: Arc<dyn ServiceCatalog>,
        documents: Arc<dyn DocumentDirectory>,
        results: Arc<dyn ResultSource>,
        molecules: Arc<dyn MoleculeDirectory>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            store,
            services,
            documents,
            results,
            molecules,
            notifications,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Load a submission.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub fn submission(&self, id: SubmissionId) -> Result<Submission, EngineError> {
        self.store.get(id).map_err(map_store)
    }

    /// The document requirements read model for a submission.
    pub fn document_requirements(
        &self,
        id: SubmissionId,
    ) -> Result<DocumentRequirements, EngineError> {
        let submission = self.submission(id)?;
        let service = self.service_for(&submission)?;
        let documents = self.documents.documents_for(id);
        Ok(DocumentRequirements::compute(service.kind, &documents))
    }

    /// Number of non-voided documents attached to a submission.
    pub fn document_count(&self, id: SubmissionId) -> Result<usize, EngineError> {
        // Existence check keeps the read model consistent with loads.
        self.submission(id)?;
        let documents = self.documents.documents_for(id);
        Ok(documents
            .iter()
            .filter(|d| d.status != crolink_workflow::DocumentStatus::Voided)
            .count())
    }

    /// The actions legal from the submission's current status that the
    /// actor would pass the permission check for.
    pub fn available_actions(
        &self,
        id: SubmissionId,
        actor: &Actor,
    ) -> Result<Vec<SubmissionAction>, EngineError> {
        let submission = self.submission(id)?;
        let service = self.service_for(&submission)?;
        let parties = submission.parties(service.provider_org);
        Ok(actions_from(submission.status())
            .into_iter()
            .filter(|action| authorize(*action, actor, &parties).is_ok())
            .collect())
    }

    // ── Draft lifecycle ──────────────────────────────────────────────

    /// Open a draft submission on behalf of a sponsor actor.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` for a CRO-side actor, a validation error for
    /// an unknown service or blank name, and `Conflict`-class store
    /// errors unchanged.
    pub fn create_draft(
        &self,
        request: DraftRequest,
        actor: &Actor,
    ) -> Result<Submission, EngineError> {
        if !actor.role.is_sponsor_side() {
            return Err(EngineError::Forbidden {
                reason: format!("role {} may not create submissions", actor.role),
            });
        }
        if self.services.service(request.service_id).is_none() {
            return Err(EngineError::Validation {
                reason: format!("unknown service {}", request.service_id),
            });
        }

        let submission = Submission::draft(request, actor.id, actor.organization)?;
        self.store.insert(submission.clone()).map_err(map_store)?;
        tracing::info!(submission = %submission.id(), actor = %actor.id, "draft opened");
        Ok(submission)
    }

    /// Apply a draft patch under the conditional-write discipline.
    ///
    /// # Errors
    ///
    /// Returns `Forbidden` unless the actor is the creator or a sponsor
    /// admin of the owning organization, `NotEditable` once the
    /// submission has left DRAFT, and `Conflict` if another writer
    /// committed since the read.
    pub fn update_draft(
        &self,
        id: SubmissionId,
        patch: DraftPatch,
        actor: &Actor,
    ) -> Result<Submission, EngineError> {
        let submission = self.submission(id)?;
        self.authorize_draft_edit(&submission, actor)?;
        if let Some(service_id) = patch.service_id {
            if self.services.service(service_id).is_none() {
                return Err(EngineError::Validation {
                    reason: format!("unknown service {service_id}"),
                });
            }
        }

        let expected = submission.version();
        let mut next = submission;
        next.apply_draft_patch(patch)?;
        self.store
            .update_conditional(next.clone(), expected)
            .map_err(map_store)?;
        Ok(next)
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// Perform a workflow action on a submission.
    ///
    /// On success the transition has committed; the outcome carries the
    /// new aggregate, any emitted events, and the integration report
    /// when propagation ran.
    pub fn perform_action(
        &self,
        id: SubmissionId,
        request: ActionRequest,
    ) -> Result<ActionOutcome, EngineError> {
        let ActionRequest {
            action,
            actor,
            payload,
        } = request;

        payload.validate_for(action)?;

        let submission = self.submission(id)?;
        let service = self.service_for(&submission)?;
        let parties = submission.parties(service.provider_org);
        authorize(action, &actor, &parties)?;

        let old_status = submission.status();
        let spec = resolve(old_status, action).ok_or(EngineError::InvalidTransition {
            from: old_status,
            action,
        })?;

        self.check_gates(&submission, &service, action)?;

        let expected = submission.version();
        let mut next = submission;
        next.apply_transition(action, actor.id, &spec, &payload, Timestamp::now())?;
        self.store
            .update_conditional(next.clone(), expected)
            .map_err(map_store)?;

        tracing::info!(
            submission = %id,
            action = %action,
            from = %old_status,
            to = %next.status(),
            version = next.version(),
            "transition committed"
        );

        let events = self.emit_events(&next, action, &actor, &payload, old_status);
        let integration = self.run_integration(id, action, &payload);

        Ok(ActionOutcome {
            submission: next,
            events,
            integration,
        })
    }

    /// Re-run results integration for a submission whose REVIEW_RESULTS
    /// transition has already committed.
    ///
    /// Recovery entry point for a crash between the status write and
    /// the propagation pass. Idempotent: the molecule collaborator
    /// upserts per row, so repeating the pass reproduces the same
    /// report.
    pub fn reapply_results(
        &self,
        id: SubmissionId,
        actor: &Actor,
    ) -> Result<IntegrationReport, EngineError> {
        let submission = self.submission(id)?;
        let service = self.service_for(&submission)?;
        authorize(
            SubmissionAction::ReviewResults,
            actor,
            &submission.parties(service.provider_org),
        )?;

        let status = submission.status();
        if !matches!(
            status,
            crolink_workflow::SubmissionStatus::ResultsReviewed
                | crolink_workflow::SubmissionStatus::Completed
        ) {
            return Err(EngineError::PreconditionFailed {
                reason: format!("results have not been reviewed (status {status})"),
            });
        }

        let rows = self.results.result_rows(id);
        Ok(apply_results(self.molecules.as_ref(), &rows))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn service_for(&self, submission: &Submission) -> Result<CroService, EngineError> {
        self.services.service(submission.service_id()).ok_or_else(|| {
            EngineError::PreconditionFailed {
                reason: format!(
                    "service {} is not in the catalog",
                    submission.service_id()
                ),
            }
        })
    }

    fn authorize_draft_edit(
        &self,
        submission: &Submission,
        actor: &Actor,
    ) -> Result<(), EngineError> {
        let same_org = actor.organization == submission.sponsor_org();
        let is_creator = actor.id == submission.created_by();
        let allowed =
            same_org && actor.role.is_sponsor_side() && (actor.role.is_admin() || is_creator);
        if allowed {
            Ok(())
        } else {
            Err(EngineError::Forbidden {
                reason: format!(
                    "actor {} may not edit submission {}",
                    actor.id,
                    submission.id()
                ),
            })
        }
    }

    fn check_gates(
        &self,
        submission: &Submission,
        service: &CroService,
        action: SubmissionAction,
    ) -> Result<(), EngineError> {
        match action {
            SubmissionAction::Submit => {
                if submission.molecule_ids().is_empty() {
                    return Err(EngineError::PreconditionFailed {
                        reason: "submission has no molecules".to_string(),
                    });
                }
                let documents = self.documents.documents_for(submission.id());
                let outcome = evaluate_gate(service.kind, &documents);
                if !outcome.submission_ready() {
                    let missing: Vec<String> =
                        outcome.missing.iter().map(|t| t.to_string()).collect();
                    return Err(EngineError::PreconditionFailed {
                        reason: format!("missing required documents: {}", missing.join(", ")),
                    });
                }
            }
            SubmissionAction::StartExperiment => {
                let documents = self.documents.documents_for(submission.id());
                let outcome = evaluate_gate(service.kind, &documents);
                if !outcome.signatures_complete() {
                    let unsigned: Vec<String> =
                        outcome.unsigned.iter().map(|t| t.to_string()).collect();
                    return Err(EngineError::PreconditionFailed {
                        reason: format!("documents awaiting signature: {}", unsigned.join(", ")),
                    });
                }
            }
            SubmissionAction::UploadResults => {
                if !self.results.has_results(submission.id()) {
                    return Err(EngineError::PreconditionFailed {
                        reason: "no result records reference this submission".to_string(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn emit_events(
        &self,
        submission: &Submission,
        action: SubmissionAction,
        actor: &Actor,
        payload: &ActionPayload,
        old_status: crolink_workflow::SubmissionStatus,
    ) -> Vec<WorkflowEvent> {
        let notifies = matches!(
            action,
            SubmissionAction::Reject
                | SubmissionAction::Cancel
                | SubmissionAction::ProvidePricing
                | SubmissionAction::UploadResults
        );
        if !notifies {
            return Vec::new();
        }

        let event = WorkflowEvent {
            submission_id: submission.id(),
            old_status,
            new_status: submission.status(),
            actor: actor.id,
            comment: payload.comment().map(str::to_string),
        };
        self.notifications.notify(event.clone());
        vec![event]
    }

    fn run_integration(
        &self,
        id: SubmissionId,
        action: SubmissionAction,
        payload: &ActionPayload,
    ) -> Option<IntegrationReport> {
        if action != SubmissionAction::ReviewResults || !payload.apply_to_molecules() {
            return None;
        }
        let rows = self.results.result_rows(id);
        let report = apply_results(self.molecules.as_ref(), &rows);
        tracing::info!(
            submission = %id,
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed,
            "results integration finished"
        );
        Some(report)
    }
}

fn map_store(err: StoreError) -> EngineError {
    match err {
        StoreError::NotFound { id } => EngineError::NotFound { id },
        StoreError::VersionConflict {
            id,
            expected,
            actual,
        } => EngineError::Conflict {
            id,
            expected,
            actual,
        },
        StoreError::AlreadyExists { id } => EngineError::Internal {
            reason: format!("submission {id} already exists"),
        },
        StoreError::Unavailable(reason) => EngineError::Internal { reason },
    }
}
