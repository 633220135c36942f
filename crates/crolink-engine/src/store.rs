//! # Submission Store — Conditional-Write Persistence Contract
//!
//! The engine's single transactional boundary. Every mutation follows
//! the same discipline: read the submission at some version, compute
//! the next state, then write conditioned on that version being
//! unchanged. A version mismatch means another writer committed in
//! between; the store reports it and the caller re-reads and retries.
//!
//! Persistence internals are out of scope — any backend that can do an
//! atomic compare-and-swap on the version column satisfies this trait.
//! [`MemoryStore`] is the reference implementation, used by the engine
//! tests and by embeddings that need a non-durable store.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;

use crolink_core::SubmissionId;

use crate::submission::Submission;

/// Errors from the persistence contract.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    /// No submission exists with the given identifier.
    #[error("submission {id} not found")]
    NotFound {
        /// The unknown identifier.
        id: SubmissionId,
    },

    /// A submission with this identifier already exists.
    #[error("submission {id} already exists")]
    AlreadyExists {
        /// The colliding identifier.
        id: SubmissionId,
    },

    /// The conditional write lost the race: the stored version is not
    /// the one the write was conditioned on.
    #[error("version conflict on {id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// The contested submission.
        id: SubmissionId,
        /// The version the write was conditioned on.
        expected: u64,
        /// The version actually stored.
        actual: u64,
    },

    /// The store's own lock or backend is unusable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// The persistence seam the engine is generic over.
pub trait SubmissionStore: Send + Sync {
    /// Load a submission by id.
    fn get(&self, id: SubmissionId) -> Result<Submission, StoreError>;

    /// Insert a brand-new submission. Fails if the id is taken.
    fn insert(&self, submission: Submission) -> Result<(), StoreError>;

    /// Replace a submission, conditioned on the stored version still
    /// being `expected_version`. The submission passed in already
    /// carries its post-mutation version.
    fn update_conditional(
        &self,
        submission: Submission,
        expected_version: u64,
    ) -> Result<(), StoreError>;
}

/// In-memory store with true compare-and-swap semantics.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<SubmissionId, Submission>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored submissions.
    pub fn len(&self) -> usize {
        self.records.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the store holds no submissions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubmissionStore for MemoryStore {
    fn get(&self, id: SubmissionId) -> Result<Submission, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        records.get(&id).cloned().ok_or(StoreError::NotFound { id })
    }

    fn insert(&self, submission: Submission) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let id = submission.id();
        if records.contains_key(&id) {
            return Err(StoreError::AlreadyExists { id });
        }
        records.insert(id, submission);
        Ok(())
    }

    fn update_conditional(
        &self,
        submission: Submission,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let id = submission.id();
        let current = records.get(&id).ok_or(StoreError::NotFound { id })?;
        if current.version() != expected_version {
            return Err(StoreError::VersionConflict {
                id,
                expected: expected_version,
                actual: current.version(),
            });
        }
        records.insert(id, submission);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submission::DraftRequest;
    use crolink_core::{ActorId, MoleculeId, OrgId, ServiceId};

    fn draft() -> Submission {
        Submission::draft(
            DraftRequest {
                name: "Solubility panel".to_string(),
                description: None,
                service_id: ServiceId::new(),
                molecule_ids: vec![MoleculeId::new()],
                specifications: None,
                metadata: None,
            },
            ActorId::new(),
            OrgId::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_insert_then_get() {
        let store = MemoryStore::new();
        let s = draft();
        let id = s.id();
        store.insert(s).unwrap();
        assert_eq!(store.get(id).unwrap().id(), id);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_double_insert_rejected() {
        let store = MemoryStore::new();
        let s = draft();
        store.insert(s.clone()).unwrap();
        assert!(matches!(
            store.insert(s),
            Err(StoreError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_get_unknown_id() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get(SubmissionId::new()),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_conditional_update_succeeds_on_matching_version() {
        let store = MemoryStore::new();
        let s = draft();
        let id = s.id();
        store.insert(s).unwrap();

        let mut loaded = store.get(id).unwrap();
        let read_version = loaded.version();
        loaded
            .apply_draft_patch(crate::submission::DraftPatch {
                name: Some("Solubility panel v2".to_string()),
                ..Default::default()
            })
            .unwrap();
        store.update_conditional(loaded, read_version).unwrap();
        assert_eq!(store.get(id).unwrap().name(), "Solubility panel v2");
    }

    #[test]
    fn test_conditional_update_loses_race() {
        let store = MemoryStore::new();
        let s = draft();
        let id = s.id();
        store.insert(s).unwrap();

        // Two writers read the same version.
        let mut first = store.get(id).unwrap();
        let mut second = store.get(id).unwrap();
        let read_version = first.version();

        first
            .apply_draft_patch(crate::submission::DraftPatch {
                name: Some("first".to_string()),
                ..Default::default()
            })
            .unwrap();
        store.update_conditional(first, read_version).unwrap();

        second
            .apply_draft_patch(crate::submission::DraftPatch {
                name: Some("second".to_string()),
                ..Default::default()
            })
            .unwrap();
        let result = store.update_conditional(second, read_version);
        assert!(matches!(
            result,
            Err(StoreError::VersionConflict {
                expected: 1,
                actual: 2,
                ..
            })
        ));
        // The first writer's state survived.
        assert_eq!(store.get(id).unwrap().name(), "first");
    }
}
