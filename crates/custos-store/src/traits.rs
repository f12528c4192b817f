use std::collections::HashMap;

use custos_crypto::MerkleProof;
use custos_types::{AccessId, EvidenceId, MovementId};

use crate::access::AccessRecord;
use crate::audit::{AuditAction, AuditEvent, AuditQuery};
use crate::error::StoreError;
use crate::evidence::EvidenceRecord;
use crate::movement::MovementRecord;

/// Evidence record storage.
///
/// Implementations must keep `all()` in creation order — the Merkle index
/// derives leaf positions from it — and must apply each mutation
/// atomically: readers never observe a half-written record.
pub trait EvidenceStore: Send + Sync {
    /// Persist a new record, assigning its display number. The caller's
    /// `evidence_no` is ignored.
    fn insert(&self, record: EvidenceRecord) -> Result<EvidenceRecord, StoreError>;

    /// Look up by id. `Ok(None)` when absent.
    fn get(&self, id: &EvidenceId) -> Result<Option<EvidenceRecord>, StoreError>;

    /// Replace an existing record in place (same id).
    fn update(&self, record: EvidenceRecord) -> Result<(), StoreError>;

    /// Remove and return a record.
    fn remove(&self, id: &EvidenceId) -> Result<EvidenceRecord, StoreError>;

    /// All records, ordered by creation time.
    fn all(&self) -> Result<Vec<EvidenceRecord>, StoreError>;

    /// Overwrite every record's inclusion proof after an index rebuild.
    /// Records missing from the map get their proof cleared — a stale proof
    /// must never survive the rebuild it predates.
    fn set_proofs(&self, proofs: &HashMap<EvidenceId, MerkleProof>) -> Result<(), StoreError>;
}

/// Movement record storage.
pub trait MovementStore: Send + Sync {
    /// Persist a new record, assigning its display number.
    fn insert(&self, record: MovementRecord) -> Result<MovementRecord, StoreError>;

    fn get(&self, id: &MovementId) -> Result<Option<MovementRecord>, StoreError>;

    fn update(&self, record: MovementRecord) -> Result<(), StoreError>;

    /// All movements of one evidence item, ordered by creation time.
    fn for_evidence(&self, evidence: &EvidenceId) -> Result<Vec<MovementRecord>, StoreError>;
}

/// Access record storage.
pub trait AccessStore: Send + Sync {
    /// Persist a new record, assigning its display number.
    fn insert(&self, record: AccessRecord) -> Result<AccessRecord, StoreError>;

    fn get(&self, id: &AccessId) -> Result<Option<AccessRecord>, StoreError>;

    fn update(&self, record: AccessRecord) -> Result<(), StoreError>;

    /// All visits touching one evidence item, ordered by creation time.
    fn for_evidence(&self, evidence: &EvidenceId) -> Result<Vec<AccessRecord>, StoreError>;
}

/// Operational audit trail.
pub trait AuditSink: Send + Sync {
    /// Append one event. The trail is append-only.
    fn record(&self, event: AuditEvent) -> Result<(), StoreError>;

    /// Events matching the filter, oldest first.
    fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEvent>, StoreError>;

    /// Event counts per action over the whole trail.
    fn action_counts(&self) -> Result<HashMap<AuditAction, u64>, StoreError>;
}
