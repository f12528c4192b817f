use custos_index::IndexError;
use custos_ledger::LedgerError;
use custos_store::StoreError;
use custos_types::{AccessId, EvidenceId, MovementId};

/// Errors surfaced by custody operations.
///
/// Negative verification outcomes are not errors — they come back as a
/// [`VerificationReport`](crate::verifier::VerificationReport). Errors here
/// are the not-found, precondition, and corruption classes.
#[derive(Debug, thiserror::Error)]
pub enum CustodyError {
    #[error("evidence not found: {0}")]
    EvidenceNotFound(EvidenceId),

    #[error("movement not found: {0}")]
    MovementNotFound(MovementId),

    #[error("access record not found: {0}")]
    AccessNotFound(AccessId),

    #[error("canonical payload encoding failed: {0}")]
    Canonical(String),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
