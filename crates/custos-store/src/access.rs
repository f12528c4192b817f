use std::fmt;

use serde::{Deserialize, Serialize};

use custos_types::{AccessId, CaseNo, EvidenceId, PrincipalId, UnixMillis};

/// Declared reason for entering the evidence room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessPurpose {
    StoreEvidence,
    TakeEvidence,
    Analysis,
    Court,
    Inspection,
}

impl fmt::Display for AccessPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::StoreEvidence => "To Store Evidence",
            Self::TakeEvidence => "To Take Evidence",
            Self::Analysis => "For Analysis",
            Self::Court => "For Court",
            Self::Inspection => "Inspection",
        };
        write!(f, "{s}")
    }
}

/// Whether the officer is still inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessStatus {
    Entered,
    Exited,
}

/// One evidence-room visit: an entry time and, once closed, an exit time.
///
/// Access records are not chained; they feed the timeline as two
/// independent points, not an interval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRecord {
    pub id: AccessId,
    /// Display number ("AL10001"-style), assigned by the store on insert.
    pub access_no: String,
    pub evidence: Option<EvidenceId>,
    pub case_no: Option<CaseNo>,
    pub officer: PrincipalId,
    pub department: String,
    pub designation: Option<String>,
    pub purpose: AccessPurpose,
    pub entry_time: UnixMillis,
    pub exit_time: Option<UnixMillis>,
    pub status: AccessStatus,
}

impl AccessRecord {
    /// Whole minutes spent inside, once the visit is closed.
    pub fn duration_minutes(&self) -> Option<u64> {
        self.exit_time.map(|exit| exit.minutes_since(self.entry_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> AccessRecord {
        AccessRecord {
            id: AccessId::new(),
            access_no: "AL10001".into(),
            evidence: Some(EvidenceId::new()),
            case_no: Some("CASE-2024-017".into()),
            officer: PrincipalId::new(),
            department: "Forensics".into(),
            designation: Some("Sergeant".into()),
            purpose: AccessPurpose::Analysis,
            entry_time: UnixMillis::new(1_700_000_000_000),
            exit_time: None,
            status: AccessStatus::Entered,
        }
    }

    #[test]
    fn open_visit_has_no_duration() {
        assert!(record().duration_minutes().is_none());
    }

    #[test]
    fn closed_visit_reports_minutes() {
        let mut access = record();
        access.exit_time = Some(UnixMillis::new(1_700_000_000_000 + 3 * 60_000));
        access.status = AccessStatus::Exited;
        assert_eq!(access.duration_minutes(), Some(3));
    }

    #[test]
    fn purpose_display_matches_custody_vocabulary() {
        assert_eq!(AccessPurpose::TakeEvidence.to_string(), "To Take Evidence");
        assert_eq!(AccessPurpose::Inspection.to_string(), "Inspection");
    }
}
