use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use custos_crypto::Keyring;
use custos_index::{LeafSubject, MerkleIndex};
use custos_ledger::ChainLedger;
use custos_store::EvidenceRecord;
use custos_types::{ChainDigest, EvidenceId, PrincipalId, StreamId};

use crate::canonical::EvidenceCanonical;
use crate::config::CustodyConfig;

/// Composite integrity verdict for one evidence record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityStatus {
    Verified,
    Tampered,
    CannotVerify,
}

impl fmt::Display for IntegrityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Verified => "VERIFIED",
            Self::Tampered => "TAMPERED",
            Self::CannotVerify => "CANNOT_VERIFY",
        };
        write!(f, "{s}")
    }
}

/// The structured outcome of a verification request.
///
/// Every individual check is reported so a caller can explain why integrity
/// failed, not just that it failed. A negative report is a normal value —
/// tampering and legacy data are expected outcomes, not errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub evidence: EvidenceId,
    pub evidence_no: String,
    pub signature_valid: bool,
    pub merkle_valid: bool,
    pub hash_chain_valid: bool,
    pub signer: Option<PrincipalId>,
    pub current_link: Option<ChainDigest>,
    pub previous_link: Option<ChainDigest>,
    pub merkle_root: Option<ChainDigest>,
    pub status: IntegrityStatus,
}

/// Re-derives and compares every integrity check for one record.
///
/// Cryptographic failures on this path — unknown signer, malformed key or
/// signature bytes, an encoding that will not serialize — are verification
/// failures, never propagated errors.
pub struct IntegrityVerifier<'a> {
    ledger: &'a ChainLedger,
    index: &'a MerkleIndex,
    keyring: &'a dyn Keyring,
    config: &'a CustodyConfig,
}

impl<'a> IntegrityVerifier<'a> {
    pub fn new(
        ledger: &'a ChainLedger,
        index: &'a MerkleIndex,
        keyring: &'a dyn Keyring,
        config: &'a CustodyConfig,
    ) -> Self {
        Self {
            ledger,
            index,
            keyring,
            config,
        }
    }

    /// Run the single-pass verification state machine over one record.
    pub fn verify(&self, record: &EvidenceRecord) -> VerificationReport {
        // Records from before signature support carry no seal; nothing can
        // be checked, and the remaining checks are not attempted.
        let Some(seal) = &record.seal else {
            return VerificationReport {
                evidence: record.id,
                evidence_no: record.evidence_no.clone(),
                signature_valid: false,
                merkle_valid: false,
                hash_chain_valid: false,
                signer: None,
                current_link: None,
                previous_link: None,
                merkle_root: None,
                status: IntegrityStatus::CannotVerify,
            };
        };

        let signature_valid = self.check_signature(record);
        let (merkle_valid, merkle_root) = self.check_inclusion(record);
        let hash_chain_valid = self.check_continuity(record);

        // Merkle inclusion is reported but does not gate the verdict unless
        // configured to.
        let mut verified = signature_valid && hash_chain_valid;
        if self.config.require_merkle {
            verified = verified && merkle_valid;
        }

        let status = if verified {
            IntegrityStatus::Verified
        } else {
            IntegrityStatus::Tampered
        };

        debug!(
            evidence = %record.id.short_id(),
            signature_valid,
            merkle_valid,
            hash_chain_valid,
            %status,
            "integrity check"
        );

        VerificationReport {
            evidence: record.id,
            evidence_no: record.evidence_no.clone(),
            signature_valid,
            merkle_valid,
            hash_chain_valid,
            signer: Some(seal.signer),
            current_link: Some(seal.current_link),
            previous_link: seal.previous_link,
            merkle_root,
            status,
        }
    }

    /// Re-derive the canonical payload from stored fields and the persisted
    /// signing timestamp, then check the stored signature against the
    /// signer's public key.
    fn check_signature(&self, record: &EvidenceRecord) -> bool {
        let Some(seal) = &record.seal else {
            return false;
        };
        let Ok(payload) = EvidenceCanonical::from_record(record, seal.signed_at).encode() else {
            return false;
        };
        let Ok(public_key) = self.keyring.verifying_key(&seal.signer) else {
            return false;
        };
        public_key.verify(&payload, &seal.signature).is_ok()
    }

    /// Merkle inclusion against the latest sealed root, using the atomic
    /// (root, proof) snapshot. Valid only when a root and a non-empty proof
    /// exist and the proof recomputes to the root.
    fn check_inclusion(&self, record: &EvidenceRecord) -> (bool, Option<ChainDigest>) {
        let root = self.index.latest_root().map(|sealed| sealed.root);
        let Some(seal) = &record.seal else {
            return (false, root);
        };
        let Some((sealed, proof)) = self.index.snapshot_for(&record.id) else {
            return (false, root);
        };
        if proof.is_empty() {
            return (false, Some(sealed.root));
        }

        let leaf = LeafSubject {
            id: record.id,
            name: record.name.clone(),
            case_no: record.case_no.clone(),
            current_link: seal.current_link,
        };
        (
            MerkleIndex::verify_inclusion(&proof, &leaf, &sealed.root),
            Some(sealed.root),
        )
    }

    /// Single-hop hash-chain continuity for the record's latest entry.
    fn check_continuity(&self, record: &EvidenceRecord) -> bool {
        let Some(seal) = &record.seal else {
            return false;
        };
        match self
            .ledger
            .find_by_link(StreamId::Evidence, &seal.current_link)
        {
            Some(entry) => self.ledger.verify_continuity(&entry),
            // The seal's own entry is missing from the ledger: fall back to
            // resolving just the previous link, the way a dangling record
            // would be checked against a partially recovered stream.
            None => match seal.previous_link {
                Some(prev) => self
                    .ledger
                    .find_by_link(StreamId::Evidence, &prev)
                    .is_some(),
                None => self.ledger.is_empty(StreamId::Evidence),
            },
        }
    }
}
