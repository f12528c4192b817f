use std::collections::HashMap;
use std::sync::RwLock;

use custos_crypto::MerkleProof;
use custos_types::{AccessId, EvidenceId, MovementId};

use crate::access::AccessRecord;
use crate::audit::{AuditAction, AuditEvent, AuditQuery};
use crate::error::StoreError;
use crate::evidence::EvidenceRecord;
use crate::movement::MovementRecord;
use crate::traits::{AccessStore, AuditSink, EvidenceStore, MovementStore};

/// In-memory evidence store for tests, demos, and embedding.
///
/// Records are kept in insertion order; display numbers come from a
/// monotonic counter so a number is never reissued after a deletion.
#[derive(Default)]
pub struct InMemoryEvidenceStore {
    inner: RwLock<Numbered<EvidenceRecord>>,
}

struct Numbered<T> {
    records: Vec<T>,
    allocated: u64,
}

impl<T> Default for Numbered<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            allocated: 0,
        }
    }
}

impl InMemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EvidenceStore for InMemoryEvidenceStore {
    fn insert(&self, mut record: EvidenceRecord) -> Result<EvidenceRecord, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if state.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::duplicate("evidence", record.id));
        }
        record.evidence_no = format!("EV{}", 1001 + state.allocated);
        state.allocated += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    fn get(&self, id: &EvidenceId) -> Result<Option<EvidenceRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.records.iter().find(|r| r.id == *id).cloned())
    }

    fn update(&self, record: EvidenceRecord) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let slot = state
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StoreError::not_found("evidence", record.id))?;
        *slot = record;
        Ok(())
    }

    fn remove(&self, id: &EvidenceId) -> Result<EvidenceRecord, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let position = state
            .records
            .iter()
            .position(|r| r.id == *id)
            .ok_or_else(|| StoreError::not_found("evidence", id))?;
        Ok(state.records.remove(position))
    }

    fn all(&self) -> Result<Vec<EvidenceRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.records.clone())
    }

    fn set_proofs(&self, proofs: &HashMap<EvidenceId, MerkleProof>) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        for record in &mut state.records {
            record.proof = proofs.get(&record.id).cloned();
        }
        Ok(())
    }
}

/// In-memory movement store.
#[derive(Default)]
pub struct InMemoryMovementStore {
    inner: RwLock<Numbered<MovementRecord>>,
}

impl InMemoryMovementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MovementStore for InMemoryMovementStore {
    fn insert(&self, mut record: MovementRecord) -> Result<MovementRecord, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if state.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::duplicate("movement", record.id));
        }
        record.movement_no = format!("ML{}", 10001 + state.allocated);
        state.allocated += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    fn get(&self, id: &MovementId) -> Result<Option<MovementRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.records.iter().find(|r| r.id == *id).cloned())
    }

    fn update(&self, record: MovementRecord) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let slot = state
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StoreError::not_found("movement", record.id))?;
        *slot = record;
        Ok(())
    }

    fn for_evidence(&self, evidence: &EvidenceId) -> Result<Vec<MovementRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state
            .records
            .iter()
            .filter(|r| r.evidence == *evidence)
            .cloned()
            .collect())
    }
}

/// In-memory access store.
#[derive(Default)]
pub struct InMemoryAccessStore {
    inner: RwLock<Numbered<AccessRecord>>,
}

impl InMemoryAccessStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccessStore for InMemoryAccessStore {
    fn insert(&self, mut record: AccessRecord) -> Result<AccessRecord, StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        if state.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::duplicate("access", record.id));
        }
        record.access_no = format!("AL{}", 10001 + state.allocated);
        state.allocated += 1;
        state.records.push(record.clone());
        Ok(record)
    }

    fn get(&self, id: &AccessId) -> Result<Option<AccessRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.records.iter().find(|r| r.id == *id).cloned())
    }

    fn update(&self, record: AccessRecord) -> Result<(), StoreError> {
        let mut state = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        let slot = state
            .records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or_else(|| StoreError::not_found("access", record.id))?;
        *slot = record;
        Ok(())
    }

    fn for_evidence(&self, evidence: &EvidenceId) -> Result<Vec<AccessRecord>, StoreError> {
        let state = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state
            .records
            .iter()
            .filter(|r| r.evidence == Some(*evidence))
            .cloned()
            .collect())
    }
}

/// In-memory audit trail.
#[derive(Default)]
pub struct InMemoryAuditLog {
    inner: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditSink for InMemoryAuditLog {
    fn record(&self, event: AuditEvent) -> Result<(), StoreError> {
        let mut events = self.inner.write().map_err(|_| StoreError::LockPoisoned)?;
        events.push(event);
        Ok(())
    }

    fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEvent>, StoreError> {
        let events = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(events.iter().filter(|e| query.matches(e)).cloned().collect())
    }

    fn action_counts(&self) -> Result<HashMap<AuditAction, u64>, StoreError> {
        let events = self.inner.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut counts = HashMap::new();
        for event in events.iter() {
            *counts.entry(event.action).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessPurpose, AccessStatus};
    use crate::evidence::{EvidenceKind, EvidenceStatus};
    use crate::movement::MovementStatus;
    use custos_types::{PrincipalId, UnixMillis};

    fn evidence(name: &str) -> EvidenceRecord {
        EvidenceRecord {
            id: EvidenceId::new(),
            evidence_no: String::new(),
            name: name.into(),
            case_no: "CASE-1".into(),
            kind: EvidenceKind::Physical,
            description: "test".into(),
            collected_by: PrincipalId::new(),
            collected_at: UnixMillis::new(1),
            collection_location: "scene".into(),
            storage_location: "locker".into(),
            storage_pointer: "shelf/1".into(),
            status: EvidenceStatus::Collected,
            attachments: vec![],
            seal: None,
            proof: None,
        }
    }

    fn movement(evidence: EvidenceId) -> MovementRecord {
        MovementRecord {
            id: MovementId::new(),
            movement_no: String::new(),
            evidence,
            case_no: "CASE-1".into(),
            source: "locker".into(),
            destination: "lab".into(),
            officer: PrincipalId::new(),
            status: MovementStatus::Departed,
            purpose: None,
            recorded_at: UnixMillis::new(2),
            seal: None,
        }
    }

    #[test]
    fn insert_assigns_sequential_display_numbers() {
        let store = InMemoryEvidenceStore::new();
        let first = store.insert(evidence("knife")).unwrap();
        let second = store.insert(evidence("wallet")).unwrap();
        assert_eq!(first.evidence_no, "EV1001");
        assert_eq!(second.evidence_no, "EV1002");
    }

    #[test]
    fn display_numbers_are_not_reissued_after_removal() {
        let store = InMemoryEvidenceStore::new();
        let first = store.insert(evidence("knife")).unwrap();
        store.remove(&first.id).unwrap();
        let second = store.insert(evidence("wallet")).unwrap();
        assert_eq!(second.evidence_no, "EV1002");
    }

    #[test]
    fn all_preserves_insertion_order() {
        let store = InMemoryEvidenceStore::new();
        for name in ["a", "b", "c"] {
            store.insert(evidence(name)).unwrap();
        }
        let names: Vec<String> = store.all().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let store = InMemoryEvidenceStore::new();
        let record = store.insert(evidence("knife")).unwrap();
        let err = store.insert(record).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[test]
    fn update_of_missing_record_is_not_found() {
        let store = InMemoryEvidenceStore::new();
        let err = store.update(evidence("ghost")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn set_proofs_clears_records_missing_from_the_map() {
        let store = InMemoryEvidenceStore::new();
        let kept = store.insert(evidence("kept")).unwrap();
        let cleared = store.insert(evidence("cleared")).unwrap();

        let mut proofs = HashMap::new();
        proofs.insert(kept.id, MerkleProof::default());
        store.set_proofs(&proofs).unwrap();

        assert!(store.get(&kept.id).unwrap().unwrap().proof.is_some());
        assert!(store.get(&cleared.id).unwrap().unwrap().proof.is_none());
    }

    #[test]
    fn movements_filter_by_evidence() {
        let store = InMemoryMovementStore::new();
        let knife = EvidenceId::new();
        let wallet = EvidenceId::new();
        store.insert(movement(knife)).unwrap();
        store.insert(movement(wallet)).unwrap();
        store.insert(movement(knife)).unwrap();

        let for_knife = store.for_evidence(&knife).unwrap();
        assert_eq!(for_knife.len(), 2);
        assert_eq!(for_knife[0].movement_no, "ML10001");
        assert_eq!(for_knife[1].movement_no, "ML10003");
    }

    #[test]
    fn access_records_for_evidence() {
        let store = InMemoryAccessStore::new();
        let knife = EvidenceId::new();
        let visit = AccessRecord {
            id: AccessId::new(),
            access_no: String::new(),
            evidence: Some(knife),
            case_no: None,
            officer: PrincipalId::new(),
            department: "Forensics".into(),
            designation: None,
            purpose: AccessPurpose::Inspection,
            entry_time: UnixMillis::new(5),
            exit_time: None,
            status: AccessStatus::Entered,
        };
        let stored = store.insert(visit).unwrap();
        assert_eq!(stored.access_no, "AL10001");
        assert_eq!(store.for_evidence(&knife).unwrap().len(), 1);
        assert_eq!(store.for_evidence(&EvidenceId::new()).unwrap().len(), 0);
    }

    #[test]
    fn audit_trail_counts_per_action() {
        let log = InMemoryAuditLog::new();
        let actor = PrincipalId::new();
        for action in [
            AuditAction::EvidenceCreated,
            AuditAction::EvidenceCreated,
            AuditAction::IndexRebuilt,
        ] {
            log.record(AuditEvent {
                action,
                actor,
                target: "EV1001".into(),
                detail: String::new(),
                at: UnixMillis::new(1),
            })
            .unwrap();
        }

        let counts = log.action_counts().unwrap();
        assert_eq!(counts[&AuditAction::EvidenceCreated], 2);
        assert_eq!(counts[&AuditAction::IndexRebuilt], 1);

        let created = log
            .query(&AuditQuery {
                action: Some(AuditAction::EvidenceCreated),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(created.len(), 2);
    }
}
