/// Errors produced by store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} record not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("duplicate {kind} record: {id}")]
    Duplicate { kind: &'static str, id: String },

    #[error("store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn duplicate(kind: &'static str, id: impl ToString) -> Self {
        Self::Duplicate {
            kind,
            id: id.to_string(),
        }
    }
}
