//! # crolink-engine — Submission Lifecycle Engine
//!
//! The orchestration layer of the CroLink platform core. A submission —
//! one sponsor request for CRO lab work against a fixed molecule set —
//! is mutated exclusively through this engine, which composes the pure
//! decision layer (`crolink-workflow`) with a conditional-write store
//! and the platform's collaborator seams.
//!
//! ## Modules
//!
//! - **`submission`** — the aggregate root: descriptive fields,
//!   workflow timestamps, commercial terms, the ordered audit trail,
//!   and the version counter. Status only moves through table-resolved
//!   transitions.
//!
//! - **`store`** — the compare-and-swap persistence contract and the
//!   in-memory reference implementation.
//!
//! - **`collaborators`** — trait seams for the service catalog,
//!   document storage, result ingestion, the molecule library, and
//!   notification dispatch, with in-memory implementations.
//!
//! - **`engine`** — `SubmissionEngine`: validate, authorize, resolve,
//!   gate, conditionally write, then run post-commit effects.
//!
//! - **`integration`** — per-row, idempotent propagation of delivered
//!   results onto molecule records with partial-failure reporting.
//!
//! - **`error`** — the typed failure taxonomy callers match on.
//!
//! ## Concurrency Model
//!
//! The engine is invoked per-request and holds no mutable state of its
//! own. Every mutation is a conditional write on the submission's
//! version counter; a lost race surfaces as `Conflict` and the caller
//! re-reads and retries. Results integration runs after the status
//! write commits, at-least-once with idempotent rows, so a crash
//! mid-propagation is recovered by [`SubmissionEngine::reapply_results`].

pub mod collaborators;
pub mod engine;
pub mod error;
pub mod integration;
pub mod store;
pub mod submission;

// ─── Engine re-exports ──────────────────────────────────────────────

pub use engine::{ActionOutcome, ActionRequest, SubmissionEngine};

// ─── Aggregate re-exports ───────────────────────────────────────────

pub use submission::{DraftPatch, DraftRequest, Submission, TransitionRecord};

// ─── Store re-exports ───────────────────────────────────────────────

pub use store::{MemoryStore, StoreError, SubmissionStore};

// ─── Collaborator re-exports ────────────────────────────────────────

pub use collaborators::{
    DocumentDirectory, ExperimentalProperty, InMemoryDocuments, InMemoryMolecules,
    InMemoryResults, InMemoryServices, MoleculeDirectory, MoleculeWriteError, NotificationSink,
    RecordingNotifications, ResultRow, ResultSource, ServiceCatalog, WorkflowEvent,
};

// ─── Integration re-exports ─────────────────────────────────────────

pub use integration::{apply_results, IntegrationReport, RowError};

// ─── Error re-exports ───────────────────────────────────────────────

pub use error::EngineError;
