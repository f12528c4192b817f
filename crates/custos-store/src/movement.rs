use std::fmt;

use serde::{Deserialize, Serialize};

use custos_ledger::ProvenanceSeal;
use custos_types::{CaseNo, EvidenceId, MovementId, PrincipalId, UnixMillis};

/// Transit state of a movement record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementStatus {
    Departed,
    InTransit,
    Arrived,
}

impl fmt::Display for MovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Departed => "Evidence Departed",
            Self::InTransit => "In Transit",
            Self::Arrived => "Evidence Arrived",
        };
        write!(f, "{s}")
    }
}

/// One movement of an evidence item between locations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRecord {
    pub id: MovementId,
    /// Display number ("ML10001"-style), assigned by the store on insert.
    pub movement_no: String,
    pub evidence: EvidenceId,
    pub case_no: CaseNo,
    pub source: String,
    pub destination: String,
    pub officer: PrincipalId,
    pub status: MovementStatus,
    pub purpose: Option<String>,
    pub recorded_at: UnixMillis,
    /// Cryptographic seal of this movement's ledger entry.
    pub seal: Option<ProvenanceSeal>,
}
