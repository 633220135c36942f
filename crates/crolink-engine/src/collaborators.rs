//! # Collaborator Seams
//!
//! The engine's neighbours — the service catalog, document storage,
//! result ingestion, the molecule library, and the notification
//! dispatcher — are out-of-scope subsystems reached through the traits
//! in this module. The engine never parses a result file, never talks
//! to a signature provider, and never renders a notification; it reads
//! and writes through these seams.
//!
//! Each trait has an in-memory implementation with the same observable
//! semantics, used by the engine tests and available to embeddings.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crolink_core::{ActorId, MoleculeId, ServiceId, SubmissionId};
use crolink_workflow::{CroService, DocumentRecord, DocumentType, SubmissionStatus};

// ─── Service Catalog ─────────────────────────────────────────────────

/// Read access to the CRO service catalog.
pub trait ServiceCatalog: Send + Sync {
    /// The service offering, if the id is known.
    fn service(&self, id: ServiceId) -> Option<CroService>;
}

/// In-memory service catalog.
#[derive(Debug, Default)]
pub struct InMemoryServices {
    services: RwLock<HashMap<ServiceId, CroService>>,
}

impl InMemoryServices {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service offering.
    pub fn register(&self, service: CroService) {
        if let Ok(mut map) = self.services.write() {
            map.insert(service.id, service);
        }
    }
}

impl ServiceCatalog for InMemoryServices {
    fn service(&self, id: ServiceId) -> Option<CroService> {
        self.services.read().ok()?.get(&id).cloned()
    }
}

// ─── Document Directory ──────────────────────────────────────────────

/// Read access to the documents attached to a submission.
pub trait DocumentDirectory: Send + Sync {
    /// All documents attached to the submission.
    fn documents_for(&self, submission: SubmissionId) -> Vec<DocumentRecord>;
}

/// In-memory document directory.
#[derive(Debug, Default)]
pub struct InMemoryDocuments {
    documents: RwLock<HashMap<SubmissionId, Vec<DocumentRecord>>>,
}

impl InMemoryDocuments {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a document to a submission.
    pub fn attach(&self, document: DocumentRecord) {
        if let Ok(mut map) = self.documents.write() {
            map.entry(document.submission_id).or_default().push(document);
        }
    }

    /// Mark every attached document of the given type as signed.
    pub fn mark_signed(&self, submission: SubmissionId, document_type: DocumentType) {
        if let Ok(mut map) = self.documents.write() {
            if let Some(docs) = map.get_mut(&submission) {
                for doc in docs.iter_mut().filter(|d| d.document_type == document_type) {
                    doc.is_signed = true;
                    doc.status = crolink_workflow::DocumentStatus::Signed;
                }
            }
        }
    }
}

impl DocumentDirectory for InMemoryDocuments {
    fn documents_for(&self, submission: SubmissionId) -> Vec<DocumentRecord> {
        self.documents
            .read()
            .ok()
            .and_then(|map| map.get(&submission).cloned())
            .unwrap_or_default()
    }
}

// ─── Result Source ───────────────────────────────────────────────────

/// One per-molecule property measurement delivered by the CRO.
///
/// Produced upstream by CSV ingestion; the engine treats rows as
/// already validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// The molecule the measurement refers to.
    pub molecule_id: MoleculeId,
    /// Property name (e.g., `"ic50"`, `"solubility"`).
    pub property: String,
    /// Measured value.
    pub value: f64,
    /// Measurement units, if any.
    pub units: Option<String>,
}

/// Read access to delivered result data.
pub trait ResultSource: Send + Sync {
    /// Whether any result record references the submission.
    fn has_results(&self, submission: SubmissionId) -> bool;

    /// All per-molecule property rows for the submission.
    fn result_rows(&self, submission: SubmissionId) -> Vec<ResultRow>;
}

/// In-memory result source.
#[derive(Debug, Default)]
pub struct InMemoryResults {
    rows: RwLock<HashMap<SubmissionId, Vec<ResultRow>>>,
}

impl InMemoryResults {
    /// Create an empty result source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record delivered rows for a submission.
    pub fn add_rows(&self, submission: SubmissionId, rows: Vec<ResultRow>) {
        if let Ok(mut map) = self.rows.write() {
            map.entry(submission).or_default().extend(rows);
        }
    }
}

impl ResultSource for InMemoryResults {
    fn has_results(&self, submission: SubmissionId) -> bool {
        self.rows
            .read()
            .map(|map| map.get(&submission).is_some_and(|rows| !rows.is_empty()))
            .unwrap_or(false)
    }

    fn result_rows(&self, submission: SubmissionId) -> Vec<ResultRow> {
        self.rows
            .read()
            .ok()
            .and_then(|map| map.get(&submission).cloned())
            .unwrap_or_default()
    }
}

// ─── Molecule Directory ──────────────────────────────────────────────

/// Errors from writing an experimental property onto a molecule.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoleculeWriteError {
    /// The molecule no longer exists in the library.
    #[error("molecule {id} not found")]
    NotFound {
        /// The missing molecule.
        id: MoleculeId,
    },

    /// The library refused the write.
    #[error("molecule {id} rejected property write: {reason}")]
    Rejected {
        /// The target molecule.
        id: MoleculeId,
        /// The library's reason.
        reason: String,
    },
}

/// Write access to the sponsor's molecule library.
pub trait MoleculeDirectory: Send + Sync {
    /// Upsert an experimentally-sourced property value onto a molecule.
    /// Idempotent per `(molecule, property)`: re-applying the same
    /// write must not duplicate history.
    fn set_experimental_property(
        &self,
        molecule: MoleculeId,
        property: &str,
        value: f64,
        units: Option<&str>,
    ) -> Result<(), MoleculeWriteError>;
}

/// An experimentally-sourced property value on a molecule record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentalProperty {
    /// Measured value.
    pub value: f64,
    /// Measurement units, if any.
    pub units: Option<String>,
}

/// In-memory molecule library keyed by `(molecule, property name)`.
#[derive(Debug, Default)]
pub struct InMemoryMolecules {
    molecules: RwLock<HashMap<MoleculeId, HashMap<String, ExperimentalProperty>>>,
}

impl InMemoryMolecules {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a molecule so property writes to it succeed.
    pub fn register(&self, id: MoleculeId) {
        if let Ok(mut map) = self.molecules.write() {
            map.entry(id).or_default();
        }
    }

    /// Remove a molecule, simulating deletion from the library.
    pub fn remove(&self, id: MoleculeId) {
        if let Ok(mut map) = self.molecules.write() {
            map.remove(&id);
        }
    }

    /// The stored property, if present.
    pub fn property(&self, id: MoleculeId, name: &str) -> Option<ExperimentalProperty> {
        self.molecules
            .read()
            .ok()?
            .get(&id)
            .and_then(|props| props.get(name).cloned())
    }

    /// Number of properties stored on a molecule.
    pub fn property_count(&self, id: MoleculeId) -> usize {
        self.molecules
            .read()
            .map(|map| map.get(&id).map(HashMap::len).unwrap_or(0))
            .unwrap_or(0)
    }
}

impl MoleculeDirectory for InMemoryMolecules {
    fn set_experimental_property(
        &self,
        molecule: MoleculeId,
        property: &str,
        value: f64,
        units: Option<&str>,
    ) -> Result<(), MoleculeWriteError> {
        let mut map = self
            .molecules
            .write()
            .map_err(|e| MoleculeWriteError::Rejected {
                id: molecule,
                reason: e.to_string(),
            })?;
        let props = map
            .get_mut(&molecule)
            .ok_or(MoleculeWriteError::NotFound { id: molecule })?;
        props.insert(
            property.to_string(),
            ExperimentalProperty {
                value,
                units: units.map(str::to_string),
            },
        );
        Ok(())
    }
}

// ─── Notification Sink ───────────────────────────────────────────────

/// The payload handed to the notification dispatcher when a transition
/// other parties care about commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowEvent {
    /// The submission that moved.
    pub submission_id: SubmissionId,
    /// Status before the transition.
    pub old_status: SubmissionStatus,
    /// Status after the transition.
    pub new_status: SubmissionStatus,
    /// The actor who drove the transition.
    pub actor: ActorId,
    /// The comment supplied with the action, where one was required.
    pub comment: Option<String>,
}

/// Consumes workflow events for out-of-scope dispatch.
pub trait NotificationSink: Send + Sync {
    /// Accept an event. Delivery semantics are the dispatcher's concern.
    fn notify(&self, event: WorkflowEvent);
}

/// Notification sink that records every event, for tests and embeddings
/// that drain events themselves.
#[derive(Debug, Default)]
pub struct RecordingNotifications {
    events: Mutex<Vec<WorkflowEvent>>,
}

impl RecordingNotifications {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of every event received so far.
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl NotificationSink for RecordingNotifications {
    fn notify(&self, event: WorkflowEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_molecule_property_upsert_is_idempotent() {
        let molecules = InMemoryMolecules::new();
        let id = MoleculeId::new();
        molecules.register(id);

        molecules
            .set_experimental_property(id, "ic50", 12.5, Some("nM"))
            .unwrap();
        molecules
            .set_experimental_property(id, "ic50", 12.5, Some("nM"))
            .unwrap();

        assert_eq!(molecules.property_count(id), 1);
        let prop = molecules.property(id, "ic50").unwrap();
        assert_eq!(prop.value, 12.5);
        assert_eq!(prop.units.as_deref(), Some("nM"));
    }

    #[test]
    fn test_property_write_to_missing_molecule_fails() {
        let molecules = InMemoryMolecules::new();
        let id = MoleculeId::new();
        let result = molecules.set_experimental_property(id, "ic50", 1.0, None);
        assert_eq!(result, Err(MoleculeWriteError::NotFound { id }));
    }

    #[test]
    fn test_result_source_emptiness() {
        let results = InMemoryResults::new();
        let submission = SubmissionId::new();
        assert!(!results.has_results(submission));

        results.add_rows(
            submission,
            vec![ResultRow {
                molecule_id: MoleculeId::new(),
                property: "logp".to_string(),
                value: 2.1,
                units: None,
            }],
        );
        assert!(results.has_results(submission));
        assert_eq!(results.result_rows(submission).len(), 1);
    }

    #[test]
    fn test_mark_signed_updates_matching_documents() {
        use crolink_workflow::{DocumentStatus, ServiceKind};
        let docs = InMemoryDocuments::new();
        let submission = SubmissionId::new();
        docs.attach(DocumentRecord {
            id: crolink_core::DocumentId::new(),
            submission_id: submission,
            document_type: DocumentType::MasterServiceAgreement,
            signature_required: true,
            is_signed: false,
            status: DocumentStatus::PendingSignature,
        });

        docs.mark_signed(submission, DocumentType::MasterServiceAgreement);
        let stored = docs.documents_for(submission);
        assert!(stored[0].is_signed);
        assert_eq!(stored[0].status, DocumentStatus::Signed);

        // The gate agrees.
        let outcome = crolink_workflow::evaluate_gate(ServiceKind::Custom, &stored);
        assert!(outcome.signatures_complete());
    }

    #[test]
    fn test_recording_sink_preserves_order() {
        let sink = RecordingNotifications::new();
        for status in [SubmissionStatus::PendingReview, SubmissionStatus::Rejected] {
            sink.notify(WorkflowEvent {
                submission_id: SubmissionId::new(),
                old_status: SubmissionStatus::PendingReview,
                new_status: status,
                actor: ActorId::new(),
                comment: None,
            });
        }
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].new_status, SubmissionStatus::Rejected);
    }
}
