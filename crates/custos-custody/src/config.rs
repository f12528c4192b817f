use serde::{Deserialize, Serialize};

/// Configuration for the custody service.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CustodyConfig {
    /// When `true`, a failed Merkle inclusion check downgrades the composite
    /// verdict to tampered. Off by default: Merkle inclusion is then
    /// reported alongside the verdict without gating it, so pre-existing
    /// deployments keep their verification semantics.
    pub require_merkle: bool,
}

impl CustodyConfig {
    /// Strict configuration: every check gates the composite verdict.
    pub fn strict() -> Self {
        Self {
            require_merkle: true,
        }
    }
}
