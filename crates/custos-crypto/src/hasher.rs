use custos_types::ChainDigest;

/// Domain-separated BLAKE3 hasher.
///
/// Each hasher carries a domain tag (e.g. `"custos-link-v1"`) that is
/// prepended to every hash computation. This prevents cross-type collisions:
/// a chain link and a Merkle leaf over identical bytes produce different
/// digests.
pub struct DomainHasher {
    domain: &'static str,
}

impl DomainHasher {
    /// Hasher for ledger chain links.
    pub const LINK: Self = Self {
        domain: "custos-link-v1",
    };
    /// Hasher for Merkle leaves (subject identifying fields).
    pub const LEAF: Self = Self {
        domain: "custos-leaf-v1",
    };
    /// Hasher for Merkle interior nodes.
    pub const NODE: Self = Self {
        domain: "custos-node-v1",
    };
    /// Hasher for attachment content.
    pub const ATTACHMENT: Self = Self {
        domain: "custos-file-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> ChainDigest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ChainDigest::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value as JSON with domain separation.
    ///
    /// Canonical structs declare their fields in the fixed encoding order;
    /// serde_json emits them in declaration order, which is what makes the
    /// encoding reproducible between write time and verify time.
    pub fn hash_json<T: serde::Serialize>(&self, value: &T) -> Result<ChainDigest, HasherError> {
        let data =
            serde_json::to_vec(value).map_err(|e| HasherError::Serialization(e.to_string()))?;
        Ok(self.hash(&data))
    }

    /// Verify that data produces the expected digest.
    pub fn verify(&self, data: &[u8], expected: &ChainDigest) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
