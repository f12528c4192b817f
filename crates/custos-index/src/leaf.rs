use serde::{Deserialize, Serialize};

use custos_crypto::DomainHasher;
use custos_types::{CaseNo, ChainDigest, EvidenceId};

use crate::error::IndexError;

/// The stable identifying fields of one subject, as committed to the tree.
///
/// Deliberately narrow: only the fields that uniquely and stably identify
/// and authenticate the subject at its latest state. Descriptive fields stay
/// out so proofs remain small and survive cosmetic edits that re-seal the
/// chain link. Field order here is the leaf encoding — do not reorder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafSubject {
    pub id: EvidenceId,
    pub name: String,
    pub case_no: CaseNo,
    pub current_link: ChainDigest,
}

impl LeafSubject {
    /// The subject's leaf digest: domain-separated hash of the canonical
    /// JSON encoding of the four fields.
    pub fn leaf_digest(&self) -> Result<ChainDigest, IndexError> {
        DomainHasher::LEAF
            .hash_json(self)
            .map_err(|e| IndexError::LeafEncoding(e.to_string()))
    }
}
