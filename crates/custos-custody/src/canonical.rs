use serde::Serialize;

use custos_store::{EvidenceKind, EvidenceRecord, MovementRecord};
use custos_types::{CaseNo, ChainDigest, EvidenceId, PrincipalId, UnixMillis};

use crate::error::CustodyError;

/// Canonical encoding of an evidence record's authenticated fields.
///
/// These bytes are what gets hashed into the chain link and signed. Field
/// order and membership are frozen: the same struct is encoded at write time
/// and re-encoded from stored fields at verify time, and the two must be
/// bit-identical. `status` is mutable over the record's life and is
/// deliberately not a member; adding a field here invalidates every
/// historical signature.
#[derive(Debug, Serialize)]
pub struct EvidenceCanonical {
    pub name: String,
    pub case_no: CaseNo,
    pub kind: EvidenceKind,
    pub description: String,
    pub collection_location: String,
    pub storage_location: String,
    pub storage_pointer: String,
    pub collected_by: PrincipalId,
    pub signed_at: UnixMillis,
    pub attachments: Vec<AttachmentRef>,
}

/// The attachment fields that participate in the canonical encoding.
#[derive(Debug, Serialize)]
pub struct AttachmentRef {
    pub file_name: String,
    pub content_hash: ChainDigest,
}

impl EvidenceCanonical {
    /// Build the canonical view of a record for a given signing timestamp.
    ///
    /// At write time `signed_at` is freshly taken; at verify time it is the
    /// timestamp persisted on the seal.
    pub fn from_record(record: &EvidenceRecord, signed_at: UnixMillis) -> Self {
        Self {
            name: record.name.clone(),
            case_no: record.case_no.clone(),
            kind: record.kind,
            description: record.description.clone(),
            collection_location: record.collection_location.clone(),
            storage_location: record.storage_location.clone(),
            storage_pointer: record.storage_pointer.clone(),
            collected_by: record.collected_by,
            signed_at,
            attachments: record
                .attachments
                .iter()
                .map(|a| AttachmentRef {
                    file_name: a.file_name.clone(),
                    content_hash: a.content_hash,
                })
                .collect(),
        }
    }

    /// The exact payload bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CustodyError> {
        serde_json::to_vec(self).map_err(|e| CustodyError::Canonical(e.to_string()))
    }
}

/// Canonical encoding of a movement record's authenticated fields.
#[derive(Debug, Serialize)]
pub struct MovementCanonical {
    pub evidence: EvidenceId,
    pub case_no: CaseNo,
    pub source: String,
    pub destination: String,
    pub purpose: Option<String>,
    pub signed_at: UnixMillis,
}

impl MovementCanonical {
    /// Build the canonical view of a movement for a given signing timestamp.
    pub fn from_record(record: &MovementRecord, signed_at: UnixMillis) -> Self {
        Self {
            evidence: record.evidence,
            case_no: record.case_no.clone(),
            source: record.source.clone(),
            destination: record.destination.clone(),
            purpose: record.purpose.clone(),
            signed_at,
        }
    }

    /// The exact payload bytes.
    pub fn encode(&self) -> Result<Vec<u8>, CustodyError> {
        serde_json::to_vec(self).map_err(|e| CustodyError::Canonical(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_store::{EvidenceStatus, MovementStatus};
    use custos_types::MovementId;

    fn record() -> EvidenceRecord {
        EvidenceRecord {
            id: EvidenceId::new(),
            evidence_no: "EV1001".into(),
            name: "kitchen knife".into(),
            case_no: "CASE-2024-017".into(),
            kind: EvidenceKind::Weapon,
            description: "recovered from scene".into(),
            collected_by: PrincipalId::new(),
            collected_at: UnixMillis::new(1_700_000_000_000),
            collection_location: "12 Hill St".into(),
            storage_location: "locker B4".into(),
            storage_pointer: "shelf/B4/3".into(),
            status: EvidenceStatus::Collected,
            attachments: vec![],
            seal: None,
            proof: None,
        }
    }

    #[test]
    fn same_record_same_timestamp_encodes_identically() {
        let record = record();
        let ts = UnixMillis::new(42);
        let first = EvidenceCanonical::from_record(&record, ts).encode().unwrap();
        let second = EvidenceCanonical::from_record(&record, ts).encode().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn timestamp_is_part_of_the_payload() {
        let record = record();
        let first = EvidenceCanonical::from_record(&record, UnixMillis::new(1))
            .encode()
            .unwrap();
        let second = EvidenceCanonical::from_record(&record, UnixMillis::new(2))
            .encode()
            .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn status_change_does_not_change_the_payload() {
        let mut record = record();
        let ts = UnixMillis::new(42);
        let before = EvidenceCanonical::from_record(&record, ts).encode().unwrap();
        record.status = EvidenceStatus::InCourt;
        let after = EvidenceCanonical::from_record(&record, ts).encode().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn descriptive_change_changes_the_payload() {
        let mut record = record();
        let ts = UnixMillis::new(42);
        let before = EvidenceCanonical::from_record(&record, ts).encode().unwrap();
        record.description = "swapped description".into();
        let after = EvidenceCanonical::from_record(&record, ts).encode().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn movement_encoding_is_reproducible() {
        let movement = MovementRecord {
            id: MovementId::new(),
            movement_no: "ML10001".into(),
            evidence: EvidenceId::new(),
            case_no: "CASE-1".into(),
            source: "locker".into(),
            destination: "lab".into(),
            officer: PrincipalId::new(),
            status: MovementStatus::Departed,
            purpose: Some("analysis".into()),
            recorded_at: UnixMillis::new(9),
            seal: None,
        };
        let ts = UnixMillis::new(9);
        assert_eq!(
            MovementCanonical::from_record(&movement, ts).encode().unwrap(),
            MovementCanonical::from_record(&movement, ts).encode().unwrap()
        );
    }
}
