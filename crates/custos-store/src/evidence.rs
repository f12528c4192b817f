use std::fmt;

use serde::{Deserialize, Serialize};

use custos_crypto::MerkleProof;
use custos_ledger::ProvenanceSeal;
use custos_types::{CaseNo, ChainDigest, EvidenceId, PrincipalId, UnixMillis};

/// Category of collected evidence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceKind {
    Digital,
    Physical,
    Biological,
    Documentary,
    Weapon,
    Drug,
    Financial,
    Other,
}

/// Custody status of an evidence record.
///
/// Mutable over the record's life and therefore deliberately excluded from
/// the canonical signed payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvidenceStatus {
    Collected,
    InStorage,
    InTransit,
    UnderAnalysis,
    InCourt,
    Disposed,
}

impl fmt::Display for EvidenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Collected => "Collected",
            Self::InStorage => "In Storage",
            Self::InTransit => "In Transit",
            Self::UnderAnalysis => "Under Analysis",
            Self::InCourt => "In Court",
            Self::Disposed => "Disposed",
        };
        write!(f, "{s}")
    }
}

/// One file attached to an evidence record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub file_name: String,
    /// Domain-separated digest of the file content.
    pub content_hash: ChainDigest,
    pub size_bytes: u64,
    pub media_type: String,
    pub uploaded_at: UnixMillis,
}

/// One item of evidence under custody.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub id: EvidenceId,
    /// Display number ("EV1001"-style), assigned by the store on insert.
    pub evidence_no: String,
    pub name: String,
    pub case_no: CaseNo,
    pub kind: EvidenceKind,
    pub description: String,
    pub collected_by: PrincipalId,
    pub collected_at: UnixMillis,
    pub collection_location: String,
    pub storage_location: String,
    /// Storage pointer: object-store key, IPFS hash, or shelf code.
    pub storage_pointer: String,
    pub status: EvidenceStatus,
    pub attachments: Vec<Attachment>,
    /// Cryptographic seal of the latest ledger entry; `None` for records
    /// that predate signature support.
    pub seal: Option<ProvenanceSeal>,
    /// Inclusion proof from the latest index rebuild.
    pub proof: Option<MerkleProof>,
}

impl EvidenceRecord {
    /// The record's current chain link, if it has ever been sealed.
    pub fn current_link(&self) -> Option<ChainDigest> {
        self.seal.as_ref().map(|seal| seal.current_link)
    }
}
