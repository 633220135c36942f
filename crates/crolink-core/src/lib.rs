//! # crolink-core — Foundational Types for the CroLink Platform
//!
//! This crate is the bedrock of the CroLink workspace. It defines the
//! type-system primitives shared by every other crate: validated
//! identifier newtypes, UTC-only timestamps, and monetary amounts in
//! integer minor units. Every other crate in the workspace depends on
//! `crolink-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `SubmissionId`,
//!    `MoleculeId`, `DocumentId`, `ServiceId`, `OrgId`, `ActorId` — no
//!    bare strings or bare UUIDs cross a crate boundary. You cannot pass
//!    a `MoleculeId` where a `SubmissionId` is expected.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so a timestamp renders identically
//!    everywhere it appears (audit trails, API payloads, logs).
//!
//! 3. **No floats for money.** `Money` stores integer minor units with a
//!    validated ISO-4217 currency code. A non-positive amount is
//!    unconstructible.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `crolink-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`/`Deserialize`.

pub mod error;
pub mod identity;
pub mod money;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use identity::{ActorId, DocumentId, MoleculeId, OrgId, ServiceId, SubmissionId};
pub use money::{CurrencyCode, Money};
pub use temporal::Timestamp;
