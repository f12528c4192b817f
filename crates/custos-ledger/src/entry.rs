use serde::{Deserialize, Serialize};

use custos_crypto::Signature;
use custos_types::{ChainDigest, PrincipalId, StreamId, SubjectId, UnixMillis};

/// One immutable link in a stream's hash chain.
///
/// Invariant: `current_link = H(canonical_payload || previous_link)`, with
/// the `GENESIS` sentinel substituting for an absent previous link. The
/// canonical payload is persisted verbatim — re-verification hashes the
/// stored bytes, never a re-serialized object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Stream this entry belongs to.
    pub stream: StreamId,
    /// 1-based position in the stream's append order.
    pub seq: u64,
    /// The record this entry attests.
    pub subject: SubjectId,
    /// Link digest of this entry.
    pub current_link: ChainDigest,
    /// Link digest of the stream tail at append time; `None` for the first
    /// entry in the stream.
    pub previous_link: Option<ChainDigest>,
    /// The exact bytes hashed and signed.
    pub canonical_payload: Vec<u8>,
    /// Signature over `canonical_payload` by `signer`.
    pub signature: Signature,
    /// Principal whose key produced the signature.
    pub signer: PrincipalId,
    /// Timestamp baked into the canonical payload at signing time.
    pub signed_at: UnixMillis,
}

/// Cryptographic fields of a ledger entry, embedded on custody records.
///
/// Records created before signature support carry no seal; the verifier
/// reports those as unverifiable rather than tampered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceSeal {
    pub current_link: ChainDigest,
    pub previous_link: Option<ChainDigest>,
    pub signature: Signature,
    pub signer: PrincipalId,
    pub signed_at: UnixMillis,
}

impl From<&LedgerEntry> for ProvenanceSeal {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            current_link: entry.current_link,
            previous_link: entry.previous_link,
            signature: entry.signature.clone(),
            signer: entry.signer,
            signed_at: entry.signed_at,
        }
    }
}

impl ProvenanceSeal {
    /// Whether the sealed record has been updated at least once.
    ///
    /// A seal whose previous link is another entry's current link means the
    /// subject's pointer has advanced past its creation entry — unless the
    /// subject was created mid-stream, which is why callers that need the
    /// exact update history enumerate the subject's entries instead.
    pub fn chains_backward(&self) -> bool {
        self.previous_link.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_crypto::{compute_link, SigningKey};
    use custos_types::EvidenceId;

    fn entry(prev: Option<ChainDigest>) -> LedgerEntry {
        let payload = b"canonical".to_vec();
        let key = SigningKey::from_bytes([1; 32]);
        LedgerEntry {
            stream: StreamId::Evidence,
            seq: 1,
            subject: EvidenceId::new().into(),
            current_link: compute_link(&payload, prev.as_ref()),
            previous_link: prev,
            signature: key.sign(&payload),
            canonical_payload: payload,
            signer: PrincipalId::new(),
            signed_at: UnixMillis::new(1_700_000_000_000),
        }
    }

    #[test]
    fn seal_copies_cryptographic_fields() {
        let e = entry(Some(ChainDigest::from_hash([4; 32])));
        let seal = ProvenanceSeal::from(&e);
        assert_eq!(seal.current_link, e.current_link);
        assert_eq!(seal.previous_link, e.previous_link);
        assert_eq!(seal.signature, e.signature);
        assert_eq!(seal.signer, e.signer);
        assert_eq!(seal.signed_at, e.signed_at);
    }

    #[test]
    fn genesis_seal_does_not_chain_backward() {
        assert!(!ProvenanceSeal::from(&entry(None)).chains_backward());
        assert!(
            ProvenanceSeal::from(&entry(Some(ChainDigest::from_hash([7; 32]))))
                .chains_backward()
        );
    }

    #[test]
    fn entry_serde_roundtrip() {
        let e = entry(None);
        let json = serde_json::to_string(&e).unwrap();
        let parsed: LedgerEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(e, parsed);
    }
}
