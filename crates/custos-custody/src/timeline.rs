use serde::{Deserialize, Serialize};

use custos_crypto::Signature;
use custos_ledger::{LedgerEntry, ProvenanceSeal};
use custos_store::{
    AccessPurpose, AccessRecord, EvidenceKind, EvidenceRecord, EvidenceStatus, MovementRecord,
    MovementStatus,
};
use custos_types::{CaseNo, ChainDigest, EvidenceId, PrincipalId, UnixMillis};

/// Kind of event on a provenance timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimelineEventKind {
    Collection,
    Movement,
    Access,
    AccessExit,
    Modification,
}

impl TimelineEventKind {
    /// Tie-break rank for events at the same timestamp: collection sorts
    /// first, then access entries, movements, access exits, modifications.
    /// Events equal on both keys keep insertion order (the sort is stable).
    fn priority(self) -> u8 {
        match self {
            Self::Collection => 0,
            Self::Access => 1,
            Self::Movement => 2,
            Self::AccessExit => 3,
            Self::Modification => 4,
        }
    }
}

/// Kind-specific payload of a timeline event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventDetail {
    Collection {
        location: String,
        evidence_name: String,
        kind: EvidenceKind,
        case_no: CaseNo,
    },
    Movement {
        source: String,
        destination: String,
        status: MovementStatus,
        purpose: Option<String>,
        case_no: CaseNo,
    },
    Access {
        purpose: AccessPurpose,
        department: String,
        designation: Option<String>,
        duration_minutes: Option<u64>,
    },
    AccessExit {
        purpose: AccessPurpose,
        department: String,
    },
    Modification {
        status: EvidenceStatus,
    },
}

/// Chain link and signature attached to an event for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    pub current_link: ChainDigest,
    pub previous_link: Option<ChainDigest>,
    pub signature: Signature,
}

impl From<&LedgerEntry> for Attestation {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            current_link: entry.current_link,
            previous_link: entry.previous_link,
            signature: entry.signature.clone(),
        }
    }
}

impl From<&ProvenanceSeal> for Attestation {
    fn from(seal: &ProvenanceSeal) -> Self {
        Self {
            current_link: seal.current_link,
            previous_link: seal.previous_link,
            signature: seal.signature.clone(),
        }
    }
}

/// One point on the merged custody history.
///
/// Timeline events are a read-time projection over ledger entries and the
/// movement/access logs; they are never persisted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub kind: TimelineEventKind,
    pub timestamp: UnixMillis,
    pub actor: PrincipalId,
    pub detail: EventDetail,
    pub attestation: Option<Attestation>,
    /// 1-based position after the global sort.
    pub sequence: u64,
}

/// Per-kind event counts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSummary {
    pub total: u64,
    pub collections: u64,
    pub movements: u64,
    pub accesses: u64,
    pub access_exits: u64,
    pub modifications: u64,
}

/// The merged, ordered custody history of one evidence item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub evidence: EvidenceId,
    pub evidence_no: String,
    pub evidence_name: String,
    pub case_no: CaseNo,
    pub current_status: EvidenceStatus,
    pub current_location: String,
    pub events: Vec<TimelineEvent>,
    pub summary: TimelineSummary,
}

/// Merge the event sources for one evidence item into a sorted, numbered
/// timeline.
///
/// `subject_entries` are the evidence-stream ledger entries attesting this
/// record, oldest first; the first is the collection write and each later
/// one is an update, emitted as its own modification event with its own
/// link and signature.
pub(crate) fn assemble(
    record: &EvidenceRecord,
    movements: &[MovementRecord],
    accesses: &[AccessRecord],
    subject_entries: &[LedgerEntry],
) -> Timeline {
    let mut events: Vec<TimelineEvent> = Vec::new();

    events.push(TimelineEvent {
        kind: TimelineEventKind::Collection,
        timestamp: record.collected_at,
        actor: record.collected_by,
        detail: EventDetail::Collection {
            location: record.collection_location.clone(),
            evidence_name: record.name.clone(),
            kind: record.kind,
            case_no: record.case_no.clone(),
        },
        attestation: subject_entries
            .first()
            .map(Attestation::from)
            .or_else(|| record.seal.as_ref().map(Attestation::from)),
        sequence: 0,
    });

    for movement in movements {
        events.push(TimelineEvent {
            kind: TimelineEventKind::Movement,
            timestamp: movement.recorded_at,
            actor: movement.officer,
            detail: EventDetail::Movement {
                source: movement.source.clone(),
                destination: movement.destination.clone(),
                status: movement.status,
                purpose: movement.purpose.clone(),
                case_no: movement.case_no.clone(),
            },
            attestation: movement.seal.as_ref().map(Attestation::from),
            sequence: 0,
        });
    }

    for access in accesses {
        events.push(TimelineEvent {
            kind: TimelineEventKind::Access,
            timestamp: access.entry_time,
            actor: access.officer,
            detail: EventDetail::Access {
                purpose: access.purpose,
                department: access.department.clone(),
                designation: access.designation.clone(),
                duration_minutes: access.duration_minutes(),
            },
            attestation: None,
            sequence: 0,
        });

        // A closed visit contributes two independent points, not an
        // interval.
        if let Some(exit_time) = access.exit_time {
            events.push(TimelineEvent {
                kind: TimelineEventKind::AccessExit,
                timestamp: exit_time,
                actor: access.officer,
                detail: EventDetail::AccessExit {
                    purpose: access.purpose,
                    department: access.department.clone(),
                },
                attestation: None,
                sequence: 0,
            });
        }
    }

    // Every entry after the collection write is one update.
    for entry in subject_entries.iter().skip(1) {
        events.push(TimelineEvent {
            kind: TimelineEventKind::Modification,
            timestamp: entry.signed_at,
            actor: entry.signer,
            detail: EventDetail::Modification {
                status: record.status,
            },
            attestation: Some(Attestation::from(entry)),
            sequence: 0,
        });
    }

    events.sort_by_key(|e| (e.timestamp, e.kind.priority()));
    for (index, event) in events.iter_mut().enumerate() {
        event.sequence = (index + 1) as u64;
    }

    let summary = summarize(&events);

    Timeline {
        evidence: record.id,
        evidence_no: record.evidence_no.clone(),
        evidence_name: record.name.clone(),
        case_no: record.case_no.clone(),
        current_status: record.status,
        current_location: record.storage_location.clone(),
        events,
        summary,
    }
}

fn summarize(events: &[TimelineEvent]) -> TimelineSummary {
    let mut summary = TimelineSummary {
        total: events.len() as u64,
        ..Default::default()
    };
    for event in events {
        match event.kind {
            TimelineEventKind::Collection => summary.collections += 1,
            TimelineEventKind::Movement => summary.movements += 1,
            TimelineEventKind::Access => summary.accesses += 1,
            TimelineEventKind::AccessExit => summary.access_exits += 1,
            TimelineEventKind::Modification => summary.modifications += 1,
        }
    }
    summary
}
