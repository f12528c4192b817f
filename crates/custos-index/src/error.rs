/// Errors produced by index operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("leaf encoding failed: {0}")]
    LeafEncoding(String),

    #[error("rebuild produced no proof for subject at position {position}")]
    MissingProof { position: usize },

    #[error("index lock poisoned")]
    LockPoisoned,
}
