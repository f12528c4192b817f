use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use custos_crypto::{MerkleProof, MerkleTree};
use custos_types::{ChainDigest, EvidenceId, UnixMillis};

use crate::error::IndexError;
use crate::leaf::LeafSubject;

/// One sealed root in the index's own append-only chain.
///
/// A root is sealed on every rebuild, even when the tree content is
/// unchanged: the chain records that a rebuild happened, not just what it
/// produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedRoot {
    pub root: ChainDigest,
    pub leaf_count: u64,
    /// Root of the previous rebuild; `None` for the first sealed root.
    pub previous_root: Option<ChainDigest>,
    pub computed_at: UnixMillis,
}

/// What one rebuild produced.
#[derive(Clone, Debug)]
pub struct RebuildOutcome {
    /// The newly sealed root, or `None` when the subject set was empty.
    pub sealed: Option<SealedRoot>,
    /// Fresh inclusion proofs, one per subject.
    pub proofs: HashMap<EvidenceId, MerkleProof>,
}

/// Full-rebuild Merkle index with a chained root history.
///
/// Rebuilds are serialized against each other behind a write lock, and a
/// (root, proof) pair is only handed out under one read guard so a reader
/// can never observe a root from one rebuild with a proof from another.
#[derive(Default)]
pub struct MerkleIndex {
    inner: RwLock<IndexState>,
}

#[derive(Default)]
struct IndexState {
    roots: Vec<SealedRoot>,
    proofs: HashMap<EvidenceId, MerkleProof>,
}

impl MerkleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the tree over the full subject set, ordered by creation.
    ///
    /// Seals a new root (chained to the previous one) and atomically
    /// replaces every proof. An empty subject set clears the proofs and
    /// seals nothing. O(n) by design: the subject set stays modest and a
    /// full rebuild keeps proof shapes stable.
    pub fn rebuild(&self, subjects: &[LeafSubject]) -> Result<RebuildOutcome, IndexError> {
        let leaves = subjects
            .iter()
            .map(LeafSubject::leaf_digest)
            .collect::<Result<Vec<_>, _>>()?;

        let mut state = self.inner.write().map_err(|_| IndexError::LockPoisoned)?;

        let Some(tree) = MerkleTree::from_leaves(leaves) else {
            state.proofs.clear();
            debug!("index rebuild over empty subject set; proofs cleared");
            return Ok(RebuildOutcome {
                sealed: None,
                proofs: HashMap::new(),
            });
        };

        let mut proofs = HashMap::with_capacity(subjects.len());
        for (position, subject) in subjects.iter().enumerate() {
            let proof = tree
                .proof(position)
                .ok_or(IndexError::MissingProof { position })?;
            proofs.insert(subject.id, proof);
        }

        let sealed = SealedRoot {
            root: tree.root(),
            leaf_count: tree.leaf_count() as u64,
            previous_root: state.roots.last().map(|r| r.root),
            computed_at: UnixMillis::now(),
        };

        state.roots.push(sealed.clone());
        state.proofs = proofs.clone();

        debug!(
            root = %sealed.root.short_hex(),
            leaves = sealed.leaf_count,
            chain_len = state.roots.len(),
            "index rebuilt"
        );

        Ok(RebuildOutcome {
            sealed: Some(sealed),
            proofs,
        })
    }

    /// Verify a subject's inclusion under a root.
    ///
    /// Recomputes the leaf digest and walks the proof. Returns `false` on
    /// any mismatch — including a leaf that no longer encodes (hash failure
    /// is a negative answer here, not an error).
    pub fn verify_inclusion(
        proof: &MerkleProof,
        subject: &LeafSubject,
        root: &ChainDigest,
    ) -> bool {
        match subject.leaf_digest() {
            Ok(leaf) => proof.verify_against(&leaf, root),
            Err(_) => false,
        }
    }

    /// The latest sealed root and the subject's current proof, captured
    /// under one read guard. `None` if either half is missing.
    pub fn snapshot_for(&self, subject: &EvidenceId) -> Option<(SealedRoot, MerkleProof)> {
        let state = self.inner.read().ok()?;
        let root = state.roots.last()?.clone();
        let proof = state.proofs.get(subject)?.clone();
        Some((root, proof))
    }

    /// The most recently sealed root.
    pub fn latest_root(&self) -> Option<SealedRoot> {
        self.inner
            .read()
            .ok()
            .and_then(|state| state.roots.last().cloned())
    }

    /// The whole root chain, oldest first.
    pub fn root_chain(&self) -> Vec<SealedRoot> {
        self.inner
            .read()
            .map(|state| state.roots.clone())
            .unwrap_or_default()
    }

    /// Check the `previous_root` linkage of the whole root chain.
    pub fn root_chain_linked(&self) -> bool {
        let roots = self.root_chain();
        roots.first().map(|r| r.previous_root.is_none()).unwrap_or(true)
            && roots
                .windows(2)
                .all(|w| w[1].previous_root == Some(w[0].root))
    }
}
