//! # Document Requirement Gate
//!
//! Each CRO service category declares which document types an engagement
//! requires and which are optional. The gate compares the declared
//! requirements against the documents actually attached to a submission
//! and reports two disjoint lists:
//!
//! - `missing` — required types with no attached document. Presence of
//!   every required type gates SUBMIT.
//! - `unsigned` — attached signature-required documents not yet signed.
//!   Signature completion gates START_EXPERIMENT, not SUBMIT.
//!
//! The gate only reads document records; it never mutates them. Document
//! storage, upload, and the e-signature round trip live with external
//! collaborators.

use serde::{Deserialize, Serialize};

use crolink_core::{DocumentId, OrgId, ServiceId, SubmissionId};

// ─── Service Catalog Types ───────────────────────────────────────────

/// The category of lab work a CRO service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceKind {
    /// Custom small-molecule synthesis.
    ChemicalSynthesis,
    /// Target binding assay panel.
    BindingAssay,
    /// Absorption/distribution/metabolism/excretion panel.
    AdmePanel,
    /// In-vitro toxicity screen.
    ToxicityScreen,
    /// Bespoke engagement outside the standard categories.
    Custom,
}

impl ServiceKind {
    /// Document types that must be attached before submission.
    pub fn required_documents(&self) -> &'static [DocumentType] {
        use DocumentType as D;
        match self {
            Self::ChemicalSynthesis => {
                &[D::MasterServiceAgreement, D::NonDisclosureAgreement, D::TechnicalSpecification]
            }
            Self::BindingAssay | Self::AdmePanel => &[
                D::MasterServiceAgreement,
                D::NonDisclosureAgreement,
                D::MaterialTransferAgreement,
            ],
            Self::ToxicityScreen => &[
                D::MasterServiceAgreement,
                D::NonDisclosureAgreement,
                D::MaterialTransferAgreement,
                D::SafetyDataSheet,
            ],
            Self::Custom => &[D::MasterServiceAgreement, D::NonDisclosureAgreement],
        }
    }

    /// Document types commonly attached but never gating.
    pub fn optional_documents(&self) -> &'static [DocumentType] {
        use DocumentType as D;
        match self {
            Self::ChemicalSynthesis => &[D::MaterialTransferAgreement, D::SafetyDataSheet],
            Self::BindingAssay => &[D::TechnicalSpecification],
            Self::AdmePanel => &[D::SafetyDataSheet],
            Self::ToxicityScreen => &[D::TechnicalSpecification],
            Self::Custom => {
                &[D::TechnicalSpecification, D::MaterialTransferAgreement, D::SafetyDataSheet, D::Quotation]
            }
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ChemicalSynthesis => "CHEMICAL_SYNTHESIS",
            Self::BindingAssay => "BINDING_ASSAY",
            Self::AdmePanel => "ADME_PANEL",
            Self::ToxicityScreen => "TOXICITY_SCREEN",
            Self::Custom => "CUSTOM",
        };
        f.write_str(s)
    }
}

/// A CRO service offering, as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CroService {
    /// Unique service identifier.
    pub id: ServiceId,
    /// Human-readable service name.
    pub name: String,
    /// The CRO organization providing the service.
    pub provider_org: OrgId,
    /// The category governing document requirements.
    pub kind: ServiceKind,
}

// ─── Document Types ──────────────────────────────────────────────────

/// The enumerated types a document attached to a submission may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentType {
    /// Master service agreement between sponsor and CRO.
    MasterServiceAgreement,
    /// Mutual non-disclosure agreement.
    NonDisclosureAgreement,
    /// Material transfer agreement for compound shipment.
    MaterialTransferAgreement,
    /// Technical specification of the requested work.
    TechnicalSpecification,
    /// Safety data sheet for shipped compounds.
    SafetyDataSheet,
    /// Formal quotation issued by the CRO.
    Quotation,
    /// Anything else attached for reference.
    Other,
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MasterServiceAgreement => "MASTER_SERVICE_AGREEMENT",
            Self::NonDisclosureAgreement => "NON_DISCLOSURE_AGREEMENT",
            Self::MaterialTransferAgreement => "MATERIAL_TRANSFER_AGREEMENT",
            Self::TechnicalSpecification => "TECHNICAL_SPECIFICATION",
            Self::SafetyDataSheet => "SAFETY_DATA_SHEET",
            Self::Quotation => "QUOTATION",
            Self::Other => "OTHER",
        };
        f.write_str(s)
    }
}

/// Where a document stands in its own (external) lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentStatus {
    /// Uploaded and available.
    Uploaded,
    /// Sent out for electronic signature.
    PendingSignature,
    /// All signatures collected.
    Signed,
    /// Withdrawn; ignored by the gate.
    Voided,
}

/// A document attached to a submission, as the gate reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique document identifier.
    pub id: DocumentId,
    /// The submission this document is attached to.
    pub submission_id: SubmissionId,
    /// The enumerated document type.
    pub document_type: DocumentType,
    /// Whether this document must be signed before work begins.
    pub signature_required: bool,
    /// Whether all signatures have been collected.
    pub is_signed: bool,
    /// The document's own lifecycle status.
    pub status: DocumentStatus,
}

impl DocumentRecord {
    /// Whether the gate should count this document at all.
    fn counts(&self) -> bool {
        self.status != DocumentStatus::Voided
    }
}

// ─── The Gate ────────────────────────────────────────────────────────

/// The gate's verdict on a submission's documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateOutcome {
    /// Required document types with no attached document.
    pub missing: Vec<DocumentType>,
    /// Attached signature-required document types not yet signed.
    pub unsigned: Vec<DocumentType>,
}

impl GateOutcome {
    /// Whether the submission gate passes: every required type present.
    pub fn submission_ready(&self) -> bool {
        self.missing.is_empty()
    }

    /// Whether all attached signature-required documents are signed.
    pub fn signatures_complete(&self) -> bool {
        self.unsigned.is_empty()
    }
}

/// Evaluate the document gate for a service category against the
/// documents attached to a submission.
///
/// Pure and read-only. Voided documents are invisible to the gate. The
/// two output lists are disjoint by construction: `missing` speaks to
/// absent types, `unsigned` to present ones.
pub fn evaluate_gate(kind: ServiceKind, documents: &[DocumentRecord]) -> GateOutcome {
    let attached: Vec<&DocumentRecord> = documents.iter().filter(|d| d.counts()).collect();

    let missing = kind
        .required_documents()
        .iter()
        .filter(|required| !attached.iter().any(|d| d.document_type == **required))
        .copied()
        .collect();

    let mut unsigned: Vec<DocumentType> = attached
        .iter()
        .filter(|d| d.signature_required && !d.is_signed)
        .map(|d| d.document_type)
        .collect();
    unsigned.sort();
    unsigned.dedup();

    GateOutcome { missing, unsigned }
}

/// The read model served to callers asking what a submission needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequirements {
    /// Types the service category requires.
    pub required: Vec<DocumentType>,
    /// Types the service category lists as optional.
    pub optional: Vec<DocumentType>,
    /// Types currently attached (voided documents excluded).
    pub existing: Vec<DocumentType>,
    /// Required types not yet attached.
    pub missing: Vec<DocumentType>,
    /// Attached signature-required types not yet signed.
    pub unsigned: Vec<DocumentType>,
}

impl DocumentRequirements {
    /// Assemble the read model from the service category and the
    /// attached documents.
    pub fn compute(kind: ServiceKind, documents: &[DocumentRecord]) -> Self {
        let outcome = evaluate_gate(kind, documents);
        let mut existing: Vec<DocumentType> = documents
            .iter()
            .filter(|d| d.counts())
            .map(|d| d.document_type)
            .collect();
        existing.sort();
        existing.dedup();

        Self {
            required: kind.required_documents().to_vec(),
            optional: kind.optional_documents().to_vec(),
            existing,
            missing: outcome.missing,
            unsigned: outcome.unsigned,
        }
    }
}
