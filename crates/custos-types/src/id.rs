use std::fmt;

use serde::{Deserialize, Serialize};

/// One independent hash-chained ledger stream.
///
/// Each stream keeps its own genesis and tail; entries never chain across
/// streams. The set is closed: evidence writes and movement writes are the
/// only chained record kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamId {
    /// All evidence record writes (create and update).
    Evidence,
    /// All movement record writes.
    Movement,
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evidence => write!(f, "evidence"),
            Self::Movement => write!(f, "movement"),
        }
    }
}

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Generate a new time-ordered identifier (UUID v7).
            pub fn new() -> Self {
                Self(uuid::Uuid::now_v7())
            }

            /// Create from an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// The underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }

            /// Short representation (first 8 characters of the UUID).
            pub fn short_id(&self) -> String {
                self.0.to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.short_id())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }
    };
}

uuid_id!(
    /// Identity of a principal (officer) in the surrounding identity system.
    PrincipalId,
    "pr"
);

uuid_id!(
    /// Identity of an evidence record.
    EvidenceId,
    "ev"
);

uuid_id!(
    /// Identity of a movement record.
    MovementId,
    "mv"
);

uuid_id!(
    /// Identity of an access record.
    AccessId,
    "ac"
);

/// Stream-agnostic subject reference carried by ledger entries.
///
/// A ledger entry attests exactly one record; the subject id lets readers
/// collect every entry about that record without walking the whole stream.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectId(uuid::Uuid);

impl SubjectId {
    /// Create from an existing UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }

    /// Short representation (first 8 characters of the UUID).
    pub fn short_id(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

impl From<EvidenceId> for SubjectId {
    fn from(id: EvidenceId) -> Self {
        Self(*id.as_uuid())
    }
}

impl From<MovementId> for SubjectId {
    fn from(id: MovementId) -> Self {
        Self(*id.as_uuid())
    }
}

impl fmt::Debug for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectId({})", self.short_id())
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human-assigned case number tying records to an investigation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseNo(String);

impl CaseNo {
    pub fn new(case_no: impl Into<String>) -> Self {
        Self(case_no.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CaseNo {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Debug for CaseNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CaseNo({})", self.0)
    }
}

impl fmt::Display for CaseNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
