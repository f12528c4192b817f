use custos_crypto::KeyringError;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("signing failed: {0}")]
    Signing(#[from] KeyringError),

    #[error("ledger lock poisoned")]
    LockPoisoned,

    #[error("link collision in stream {stream}")]
    LinkCollision { stream: custos_types::StreamId },
}
