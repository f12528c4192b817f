use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Sentinel previous-link value for the first entry in a stream.
///
/// When an entry has no predecessor, the literal bytes `GENESIS` substitute
/// for the previous link in the chain-link hash input, and the same text is
/// shown wherever a previous link is displayed.
pub const GENESIS: &str = "GENESIS";

/// 32-byte BLAKE3 digest used for chain links, Merkle leaves, and roots.
///
/// Identical input always produces the same `ChainDigest`, which is what
/// makes links recomputable and tampering detectable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainDigest([u8; 32]);

impl ChainDigest {
    /// Create from a pre-computed 32-byte hash.
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string (64 hex characters).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    /// Render an optional previous link: the hex digest, or [`GENESIS`].
    pub fn display_link(link: Option<&ChainDigest>) -> String {
        match link {
            Some(digest) => digest.to_hex(),
            None => GENESIS.to_string(),
        }
    }
}

impl fmt::Debug for ChainDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChainDigest({})", self.short_hex())
    }
}

impl fmt::Display for ChainDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for ChainDigest {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl From<ChainDigest> for [u8; 32] {
    fn from(digest: ChainDigest) -> Self {
        digest.0
    }
}
