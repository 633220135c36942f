//! # Results Integration
//!
//! Propagates CRO-delivered property measurements onto the sponsor's
//! molecule records. Runs after the REVIEW_RESULTS transition has
//! committed, so a propagation failure never rolls the workflow back —
//! the report rides on the successful response instead.
//!
//! Every row is applied independently: one molecule having been deleted
//! must not stop the remaining rows from landing. The molecule
//! collaborator upserts by `(molecule, property name)`, which makes the
//! whole pass idempotent — re-running it after a crash reproduces the
//! same counts without duplicating property history.

use serde::{Deserialize, Serialize};

use crolink_core::MoleculeId;

use crate::collaborators::{MoleculeDirectory, ResultRow};

/// Why one row failed to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// The molecule the row targeted.
    pub molecule_id: MoleculeId,
    /// The property the row carried.
    pub property: String,
    /// The collaborator's reason.
    pub reason: String,
}

/// The outcome of one integration pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationReport {
    /// Rows attempted.
    pub total: usize,
    /// Rows applied.
    pub succeeded: usize,
    /// Rows that failed.
    pub failed: usize,
    /// One entry per failed row.
    pub errors: Vec<RowError>,
}

impl IntegrationReport {
    /// Whether every row applied.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Apply every result row to the molecule library, independently.
pub fn apply_results(molecules: &dyn MoleculeDirectory, rows: &[ResultRow]) -> IntegrationReport {
    let mut errors = Vec::new();

    for row in rows {
        let outcome = molecules.set_experimental_property(
            row.molecule_id,
            &row.property,
            row.value,
            row.units.as_deref(),
        );
        if let Err(e) = outcome {
            tracing::warn!(
                molecule = %row.molecule_id,
                property = %row.property,
                error = %e,
                "result row failed to apply"
            );
            errors.push(RowError {
                molecule_id: row.molecule_id,
                property: row.property.clone(),
                reason: e.to_string(),
            });
        }
    }

    IntegrationReport {
        total: rows.len(),
        succeeded: rows.len() - errors.len(),
        failed: errors.len(),
        errors,
    }
}
