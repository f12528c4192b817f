use std::fmt;

use serde::{Deserialize, Serialize};

use custos_types::{PrincipalId, UnixMillis};

/// Operational actions recorded on the audit trail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AuditAction {
    EvidenceCreated,
    EvidenceUpdated,
    EvidenceDeleted,
    MovementRecorded,
    MovementStatusChanged,
    AccessRecorded,
    AccessClosed,
    IndexRebuilt,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::EvidenceCreated => "EVIDENCE_CREATED",
            Self::EvidenceUpdated => "EVIDENCE_UPDATED",
            Self::EvidenceDeleted => "EVIDENCE_DELETED",
            Self::MovementRecorded => "MOVEMENT_RECORDED",
            Self::MovementStatusChanged => "MOVEMENT_STATUS_CHANGED",
            Self::AccessRecorded => "ACCESS_RECORDED",
            Self::AccessClosed => "ACCESS_CLOSED",
            Self::IndexRebuilt => "INDEX_REBUILT",
        };
        write!(f, "{s}")
    }
}

/// One row on the operational audit trail.
///
/// The audit trail is bookkeeping, not tamper-evidence: it records who did
/// what and when, while the ledger records what the bytes were.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub actor: PrincipalId,
    /// Display identifier of the target record ("EV1001", "ML10001", ...).
    pub target: String,
    pub detail: String,
    pub at: UnixMillis,
}

/// Filter for audit-trail queries. Empty fields match everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuditQuery {
    pub action: Option<AuditAction>,
    pub actor: Option<PrincipalId>,
    pub from: Option<UnixMillis>,
    pub to: Option<UnixMillis>,
}

impl AuditQuery {
    pub fn matches(&self, event: &AuditEvent) -> bool {
        self.action.map(|a| a == event.action).unwrap_or(true)
            && self.actor.map(|a| a == event.actor).unwrap_or(true)
            && self.from.map(|t| event.at >= t).unwrap_or(true)
            && self.to.map(|t| event.at <= t).unwrap_or(true)
    }
}
