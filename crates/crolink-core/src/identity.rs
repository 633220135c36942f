//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the CroLink platform.
//! These prevent accidental identifier confusion — you cannot pass a
//! `MoleculeId` where a `SubmissionId` is expected, and a sponsor
//! organization id cannot silently stand in for an actor id.
//!
//! Each identifier renders with a namespace prefix (`submission:`,
//! `molecule:`, ...) so a bare UUID in a log line is always attributable.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a CRO service submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

/// Unique identifier for a molecule record in the sponsor's library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoleculeId(pub Uuid);

/// Unique identifier for a document attached to a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub Uuid);

/// Unique identifier for a CRO service offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub Uuid);

/// Unique identifier for an organization (sponsor or CRO).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(pub Uuid);

/// Unique identifier for a platform user acting on a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

macro_rules! impl_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

impl_id!(SubmissionId, "submission");
impl_id!(MoleculeId, "molecule");
impl_id!(DocumentId, "document");
impl_id!(ServiceId, "service");
impl_id!(OrgId, "org");
impl_id!(ActorId, "actor");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_namespace_prefix() {
        let id = SubmissionId::new();
        assert!(id.to_string().starts_with("submission:"));
        assert!(MoleculeId::new().to_string().starts_with("molecule:"));
        assert!(ActorId::new().to_string().starts_with("actor:"));
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(SubmissionId::new(), SubmissionId::new());
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = OrgId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: OrgId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
