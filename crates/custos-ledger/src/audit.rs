use custos_crypto::compute_link;
use custos_types::StreamId;

use crate::ledger::ChainLedger;

/// Result of a full-chain audit walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainAuditReport {
    pub stream: StreamId,
    pub entry_count: u64,
    pub violations: Vec<AuditViolation>,
}

impl ChainAuditReport {
    /// Returns `true` if the whole chain recomputed cleanly from genesis.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific integrity violation found during the audit walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditViolation {
    pub seq: u64,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    /// Entry at seq 1 claims a previous link.
    GenesisConflict,
    /// previous_link does not match the preceding entry's current_link.
    BrokenLink,
    /// Recomputed `H(payload || prev)` differs from the stored link.
    LinkMismatch,
    /// Sequence numbers are not 1..N in append order.
    SequenceGap,
}

impl ChainLedger {
    /// Walk a stream from genesis, recomputing every link end to end.
    ///
    /// The single-hop [`verify_continuity`](ChainLedger::verify_continuity)
    /// only proves an entry's predecessor exists; this walk proves the whole
    /// prefix is untampered. Callers choose per cost: the hop check is O(1),
    /// the audit is O(n).
    pub fn audit_stream(&self, stream: StreamId) -> ChainAuditReport {
        let entries = self.entries(stream);
        let mut violations = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let expected_seq = (index + 1) as u64;
            if entry.seq != expected_seq {
                violations.push(AuditViolation {
                    seq: entry.seq,
                    kind: ViolationKind::SequenceGap,
                    description: format!("expected seq {expected_seq}, found {}", entry.seq),
                });
            }

            let expected_prev = if index == 0 {
                None
            } else {
                Some(entries[index - 1].current_link)
            };
            if entry.previous_link != expected_prev {
                let kind = if index == 0 {
                    ViolationKind::GenesisConflict
                } else {
                    ViolationKind::BrokenLink
                };
                violations.push(AuditViolation {
                    seq: entry.seq,
                    kind,
                    description: "previous link does not match stream order".into(),
                });
            }

            let recomputed = compute_link(&entry.canonical_payload, entry.previous_link.as_ref());
            if recomputed != entry.current_link {
                violations.push(AuditViolation {
                    seq: entry.seq,
                    kind: ViolationKind::LinkMismatch,
                    description: "stored link differs from recomputed link".into(),
                });
            }
        }

        ChainAuditReport {
            stream,
            entry_count: entries.len() as u64,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_crypto::InMemoryKeyring;
    use custos_types::{EvidenceId, PrincipalId, UnixMillis};

    fn populated_ledger(count: usize) -> ChainLedger {
        let officer = PrincipalId::new();
        let keyring = InMemoryKeyring::new();
        keyring.enroll(officer).unwrap();
        let ledger = ChainLedger::new();
        for i in 0..count {
            ledger
                .append(
                    StreamId::Evidence,
                    EvidenceId::new().into(),
                    format!("payload-{i}").into_bytes(),
                    officer,
                    UnixMillis::new(i as u64),
                    &keyring,
                )
                .unwrap();
        }
        ledger
    }

    #[test]
    fn empty_stream_audits_clean() {
        let ledger = ChainLedger::new();
        let report = ledger.audit_stream(StreamId::Evidence);
        assert!(report.is_valid());
        assert_eq!(report.entry_count, 0);
    }

    #[test]
    fn untampered_stream_audits_clean() {
        let report = populated_ledger(10).audit_stream(StreamId::Evidence);
        assert!(report.is_valid());
        assert_eq!(report.entry_count, 10);
    }

    #[test]
    fn audit_report_carries_the_stream() {
        let report = populated_ledger(1).audit_stream(StreamId::Evidence);
        assert_eq!(report.stream, StreamId::Evidence);
    }

    #[test]
    fn tampered_payload_is_reported_as_link_mismatch() {
        let ledger = populated_ledger(4);
        ledger.corrupt_payload(StreamId::Evidence, 2, b"rewritten history".to_vec());

        let report = ledger.audit_stream(StreamId::Evidence);
        assert!(!report.is_valid());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].seq, 2);
        assert_eq!(report.violations[0].kind, ViolationKind::LinkMismatch);
    }

    #[test]
    fn single_hop_check_misses_what_the_audit_catches() {
        let ledger = populated_ledger(4);
        ledger.corrupt_payload(StreamId::Evidence, 2, b"rewritten history".to_vec());

        // Entry 3's previous link still resolves, so the hop check passes;
        // only the full walk notices entry 2 no longer hashes to its link.
        let entries = ledger.entries(StreamId::Evidence);
        assert!(ledger.verify_continuity(&entries[2]));
        assert!(!ledger.audit_stream(StreamId::Evidence).is_valid());
    }
}
