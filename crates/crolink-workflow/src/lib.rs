//! # crolink-workflow — Submission Lifecycle Decision Layer
//!
//! The pure, side-effect-free half of the submission lifecycle. Nothing
//! in this crate touches a store, a clock, or a collaborator: given a
//! status, an action, an actor, and a set of documents, it answers
//! *whether* a step is allowed and *what* the step must do — never
//! performs the step.
//!
//! ## Modules
//!
//! - **`status`** — the eleven submission statuses with terminal /
//!   editable / active classification.
//!
//! - **`action`** — the nine workflow actions and their typed payloads
//!   (pricing terms, mandatory comments, the apply-to-molecules flag),
//!   with structural validation.
//!
//! - **`transition`** — the tagged transition table: `(status, action)`
//!   resolves to a target status plus a declared list of effects
//!   (timestamp recording, pricing capture). Adding a status or action
//!   forces the table to be revisited; an exhaustive sweep test pins
//!   every cell.
//!
//! - **`permission`** — per-action role and organization policy.
//!   Sponsor-side roles act for the sponsor organization, CRO-side roles
//!   for the provider organization; unknown combinations fail closed.
//!
//! - **`documents`** — the per-service document requirement matrix and
//!   the gate that computes missing and unsigned document types.
//!
//! ## Design
//!
//! The orchestration layer (`crolink-engine`) composes these pieces in a
//! fixed order and applies the declared effects under optimistic
//! concurrency. Keeping the decision layer pure means every rule here is
//! unit-testable without fixtures: the transition table alone answers
//! 99 `(status, action)` cells, and the tests enumerate all of them.

pub mod action;
pub mod documents;
pub mod permission;
pub mod status;
pub mod transition;

// ─── Status re-exports ──────────────────────────────────────────────

pub use status::{SubmissionStatus, ALL_STATUSES};

// ─── Action re-exports ──────────────────────────────────────────────

pub use action::{ActionPayload, PayloadError, PricingTerms, SubmissionAction, ALL_ACTIONS};

// ─── Transition re-exports ──────────────────────────────────────────

pub use transition::{actions_from, resolve, Effect, TransitionSpec};

// ─── Permission re-exports ──────────────────────────────────────────

pub use permission::{authorize, Actor, OrgScope, PermissionError, Role, SubmissionParties};

// ─── Document gate re-exports ───────────────────────────────────────

pub use documents::{
    evaluate_gate, CroService, DocumentRecord, DocumentRequirements, DocumentStatus, DocumentType,
    GateOutcome, ServiceKind,
};
