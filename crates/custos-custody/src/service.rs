use std::sync::Arc;

use tracing::info;

use custos_crypto::{DomainHasher, Keyring};
use custos_index::{LeafSubject, MerkleIndex, SealedRoot};
use custos_ledger::{ChainAuditReport, ChainLedger, ProvenanceSeal};
use custos_store::{
    AccessPurpose, AccessRecord, AccessStatus, AccessStore, Attachment, AuditAction, AuditEvent,
    AuditSink, EvidenceKind, EvidenceRecord, EvidenceStatus, EvidenceStore, InMemoryAccessStore,
    InMemoryAuditLog, InMemoryEvidenceStore, InMemoryMovementStore, MovementRecord,
    MovementStatus, MovementStore,
};
use custos_types::{
    AccessId, CaseNo, EvidenceId, MovementId, PrincipalId, StreamId, UnixMillis,
};

use crate::canonical::{EvidenceCanonical, MovementCanonical};
use crate::config::CustodyConfig;
use crate::error::CustodyError;
use crate::timeline::{self, Timeline};
use crate::verifier::{IntegrityVerifier, VerificationReport};

/// Input for collecting a new evidence item.
#[derive(Clone, Debug)]
pub struct EvidenceDraft {
    pub name: String,
    pub case_no: CaseNo,
    pub kind: EvidenceKind,
    pub description: String,
    pub collection_location: String,
    pub storage_location: String,
    pub storage_pointer: String,
    pub attachments: Vec<AttachmentDraft>,
}

/// One file handed in with a new evidence item. The content is hashed here;
/// storing the bytes is the file-store collaborator's concern.
#[derive(Clone, Debug)]
pub struct AttachmentDraft {
    pub file_name: String,
    pub media_type: String,
    pub content: Vec<u8>,
}

/// Descriptive changes applied by an evidence update. `None` leaves the
/// field untouched. Cryptographic fields cannot be changed from here.
#[derive(Clone, Debug, Default)]
pub struct EvidenceChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub storage_location: Option<String>,
    pub storage_pointer: Option<String>,
    pub status: Option<EvidenceStatus>,
}

/// Input for recording a movement.
#[derive(Clone, Debug)]
pub struct MovementDraft {
    pub evidence: EvidenceId,
    pub source: String,
    pub destination: String,
    pub purpose: Option<String>,
}

/// Input for recording an evidence-room visit.
#[derive(Clone, Debug)]
pub struct AccessDraft {
    pub evidence: Option<EvidenceId>,
    pub case_no: Option<CaseNo>,
    pub department: String,
    pub designation: Option<String>,
    pub purpose: AccessPurpose,
}

/// The custody service: every exposed operation of the provenance core.
///
/// Writes run to completion one request at a time per shared resource: the
/// ledger serializes appends per stream, the index serializes rebuilds, and
/// each store applies its mutation atomically. Verification and timeline
/// building are pure reads.
pub struct CustodyService {
    config: CustodyConfig,
    keyring: Arc<dyn Keyring>,
    ledger: ChainLedger,
    index: MerkleIndex,
    evidence: Arc<dyn EvidenceStore>,
    movements: Arc<dyn MovementStore>,
    accesses: Arc<dyn AccessStore>,
    audit: Arc<dyn AuditSink>,
}

impl CustodyService {
    pub fn new(
        config: CustodyConfig,
        keyring: Arc<dyn Keyring>,
        evidence: Arc<dyn EvidenceStore>,
        movements: Arc<dyn MovementStore>,
        accesses: Arc<dyn AccessStore>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            config,
            keyring,
            ledger: ChainLedger::new(),
            index: MerkleIndex::new(),
            evidence,
            movements,
            accesses,
            audit,
        }
    }

    /// Service over fresh in-memory stores, for tests and embedding.
    pub fn in_memory(config: CustodyConfig, keyring: Arc<dyn Keyring>) -> Self {
        Self::new(
            config,
            keyring,
            Arc::new(InMemoryEvidenceStore::new()),
            Arc::new(InMemoryMovementStore::new()),
            Arc::new(InMemoryAccessStore::new()),
            Arc::new(InMemoryAuditLog::new()),
        )
    }

    // ---- Evidence write path ----

    /// Collect a new evidence item: chain, sign, persist, re-index.
    pub fn add_evidence(
        &self,
        draft: EvidenceDraft,
        collector: PrincipalId,
    ) -> Result<EvidenceRecord, CustodyError> {
        let signed_at = UnixMillis::now();
        let attachments = draft
            .attachments
            .into_iter()
            .map(|a| Attachment {
                content_hash: DomainHasher::ATTACHMENT.hash(&a.content),
                size_bytes: a.content.len() as u64,
                file_name: a.file_name,
                media_type: a.media_type,
                uploaded_at: signed_at,
            })
            .collect();

        let mut record = EvidenceRecord {
            id: EvidenceId::new(),
            evidence_no: String::new(),
            name: draft.name,
            case_no: draft.case_no,
            kind: draft.kind,
            description: draft.description,
            collected_by: collector,
            collected_at: signed_at,
            collection_location: draft.collection_location,
            storage_location: draft.storage_location,
            storage_pointer: draft.storage_pointer,
            status: EvidenceStatus::Collected,
            attachments,
            seal: None,
            proof: None,
        };

        let payload = EvidenceCanonical::from_record(&record, signed_at).encode()?;
        let entry = self.ledger.append(
            StreamId::Evidence,
            record.id.into(),
            payload,
            collector,
            signed_at,
            self.keyring.as_ref(),
        )?;
        record.seal = Some(ProvenanceSeal::from(&entry));

        let stored = self.evidence.insert(record)?;
        self.rebuild_index(collector)?;

        info!(
            evidence = %stored.evidence_no,
            case = %stored.case_no,
            link = %entry.current_link.short_hex(),
            "evidence collected"
        );
        self.audit(
            AuditAction::EvidenceCreated,
            collector,
            &stored.evidence_no,
            format!("{} ({})", stored.name, stored.case_no),
        )?;

        self.fetch(&stored.id)
    }

    /// Amend an evidence record: the chain advances, the old entry stays.
    pub fn update_evidence(
        &self,
        id: &EvidenceId,
        changes: EvidenceChanges,
        actor: PrincipalId,
    ) -> Result<EvidenceRecord, CustodyError> {
        let mut record = self.fetch(id)?;

        if let Some(name) = changes.name {
            record.name = name;
        }
        if let Some(description) = changes.description {
            record.description = description;
        }
        if let Some(storage_location) = changes.storage_location {
            record.storage_location = storage_location;
        }
        if let Some(storage_pointer) = changes.storage_pointer {
            record.storage_pointer = storage_pointer;
        }
        if let Some(status) = changes.status {
            record.status = status;
        }

        let signed_at = UnixMillis::now();
        let payload = EvidenceCanonical::from_record(&record, signed_at).encode()?;
        let entry = self.ledger.append(
            StreamId::Evidence,
            record.id.into(),
            payload,
            actor,
            signed_at,
            self.keyring.as_ref(),
        )?;
        record.seal = Some(ProvenanceSeal::from(&entry));

        self.evidence.update(record.clone())?;
        self.rebuild_index(actor)?;

        info!(
            evidence = %record.evidence_no,
            link = %entry.current_link.short_hex(),
            "evidence amended"
        );
        self.audit(
            AuditAction::EvidenceUpdated,
            actor,
            &record.evidence_no,
            format!("{} ({})", record.name, record.case_no),
        )?;

        self.fetch(id)
    }

    /// Remove an evidence record. Its ledger entries remain — the chain
    /// never forgets — but the record leaves the tree on the next root.
    pub fn delete_evidence(
        &self,
        id: &EvidenceId,
        actor: PrincipalId,
    ) -> Result<EvidenceRecord, CustodyError> {
        // Surface absence as the custody-level not-found, same as reads.
        let _ = self.fetch(id)?;
        let removed = self.evidence.remove(id)?;
        self.rebuild_index(actor)?;

        info!(evidence = %removed.evidence_no, "evidence removed");
        self.audit(
            AuditAction::EvidenceDeleted,
            actor,
            &removed.evidence_no,
            format!("{} ({})", removed.name, removed.case_no),
        )?;

        Ok(removed)
    }

    // ---- Movement / access write path ----

    /// Record a movement: its own chained, signed entry on the movement
    /// stream; the evidence goes in transit.
    pub fn record_movement(
        &self,
        draft: MovementDraft,
        officer: PrincipalId,
    ) -> Result<MovementRecord, CustodyError> {
        let mut evidence = self.fetch(&draft.evidence)?;

        let signed_at = UnixMillis::now();
        let mut record = MovementRecord {
            id: MovementId::new(),
            movement_no: String::new(),
            evidence: evidence.id,
            case_no: evidence.case_no.clone(),
            source: draft.source,
            destination: draft.destination,
            officer,
            status: MovementStatus::Departed,
            purpose: draft.purpose,
            recorded_at: signed_at,
            seal: None,
        };

        let payload = MovementCanonical::from_record(&record, signed_at).encode()?;
        let entry = self.ledger.append(
            StreamId::Movement,
            record.id.into(),
            payload,
            officer,
            signed_at,
            self.keyring.as_ref(),
        )?;
        record.seal = Some(ProvenanceSeal::from(&entry));

        let stored = self.movements.insert(record)?;

        // Status is outside the canonical encoding, so this does not re-seal
        // the evidence record.
        evidence.status = EvidenceStatus::InTransit;
        self.evidence.update(evidence)?;

        info!(
            movement = %stored.movement_no,
            evidence = %draft.evidence.short_id(),
            "movement recorded"
        );
        self.audit(
            AuditAction::MovementRecorded,
            officer,
            &stored.movement_no,
            format!("{} -> {}", stored.source, stored.destination),
        )?;

        Ok(stored)
    }

    /// Mark a movement as arrived; the evidence settles back into storage.
    pub fn movement_arrived(
        &self,
        id: &MovementId,
        actor: PrincipalId,
    ) -> Result<MovementRecord, CustodyError> {
        let mut record = self
            .movements
            .get(id)?
            .ok_or(CustodyError::MovementNotFound(*id))?;

        record.status = MovementStatus::Arrived;
        self.movements.update(record.clone())?;

        if let Some(mut evidence) = self.evidence.get(&record.evidence)? {
            evidence.status = EvidenceStatus::InStorage;
            self.evidence.update(evidence)?;
        }

        self.audit(
            AuditAction::MovementStatusChanged,
            actor,
            &record.movement_no,
            record.status.to_string(),
        )?;

        Ok(record)
    }

    /// Record an evidence-room entry.
    pub fn record_access(
        &self,
        draft: AccessDraft,
        officer: PrincipalId,
    ) -> Result<AccessRecord, CustodyError> {
        let record = AccessRecord {
            id: AccessId::new(),
            access_no: String::new(),
            evidence: draft.evidence,
            case_no: draft.case_no,
            officer,
            department: draft.department,
            designation: draft.designation,
            purpose: draft.purpose,
            entry_time: UnixMillis::now(),
            exit_time: None,
            status: AccessStatus::Entered,
        };
        let stored = self.accesses.insert(record)?;

        self.audit(
            AuditAction::AccessRecorded,
            officer,
            &stored.access_no,
            stored.purpose.to_string(),
        )?;

        Ok(stored)
    }

    /// Close a visit with an exit time.
    pub fn close_access(&self, id: &AccessId) -> Result<AccessRecord, CustodyError> {
        let mut record = self
            .accesses
            .get(id)?
            .ok_or(CustodyError::AccessNotFound(*id))?;

        record.exit_time = Some(UnixMillis::now());
        record.status = AccessStatus::Exited;
        self.accesses.update(record.clone())?;

        self.audit(
            AuditAction::AccessClosed,
            record.officer,
            &record.access_no,
            record.purpose.to_string(),
        )?;

        Ok(record)
    }

    // ---- Read paths ----

    /// Composite integrity verdict for one record.
    pub fn verify(&self, id: &EvidenceId) -> Result<VerificationReport, CustodyError> {
        let record = self.fetch(id)?;
        let verifier = IntegrityVerifier::new(
            &self.ledger,
            &self.index,
            self.keyring.as_ref(),
            &self.config,
        );
        Ok(verifier.verify(&record))
    }

    /// The merged, sequence-numbered custody history of one record.
    pub fn timeline(&self, id: &EvidenceId) -> Result<Timeline, CustodyError> {
        let record = self.fetch(id)?;
        let movements = self.movements.for_evidence(id)?;
        let accesses = self.accesses.for_evidence(id)?;
        let entries = self.ledger.entries_for_subject(StreamId::Evidence, (*id).into());
        Ok(timeline::assemble(&record, &movements, &accesses, &entries))
    }

    /// Full-chain audit walk of one ledger stream.
    pub fn audit_stream(&self, stream: StreamId) -> ChainAuditReport {
        self.ledger.audit_stream(stream)
    }

    /// The most recently sealed Merkle root.
    pub fn latest_root(&self) -> Option<SealedRoot> {
        self.index.latest_root()
    }

    /// The whole sealed-root chain, oldest first.
    pub fn root_chain(&self) -> Vec<SealedRoot> {
        self.index.root_chain()
    }

    // ---- Internals ----

    fn fetch(&self, id: &EvidenceId) -> Result<EvidenceRecord, CustodyError> {
        self.evidence
            .get(id)?
            .ok_or(CustodyError::EvidenceNotFound(*id))
    }

    /// Full rebuild over the current evidence set, in creation order.
    /// Records without a seal predate the chain and cannot become leaves.
    fn rebuild_index(&self, actor: PrincipalId) -> Result<Option<SealedRoot>, CustodyError> {
        let subjects: Vec<LeafSubject> = self
            .evidence
            .all()?
            .into_iter()
            .filter_map(|record| {
                let link = record.current_link()?;
                Some(LeafSubject {
                    id: record.id,
                    name: record.name,
                    case_no: record.case_no,
                    current_link: link,
                })
            })
            .collect();

        let outcome = self.index.rebuild(&subjects)?;
        self.evidence.set_proofs(&outcome.proofs)?;

        if let Some(sealed) = &outcome.sealed {
            self.audit(
                AuditAction::IndexRebuilt,
                actor,
                &sealed.root.short_hex(),
                format!("{} leaves", sealed.leaf_count),
            )?;
        }

        Ok(outcome.sealed)
    }

    fn audit(
        &self,
        action: AuditAction,
        actor: PrincipalId,
        target: &str,
        detail: String,
    ) -> Result<(), CustodyError> {
        self.audit.record(AuditEvent {
            action,
            actor,
            target: target.to_string(),
            detail,
            at: UnixMillis::now(),
        })?;
        Ok(())
    }
}
