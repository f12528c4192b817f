use serde::{Deserialize, Serialize};

use custos_types::ChainDigest;

use crate::hasher::DomainHasher;

/// Side of a sibling in a Merkle proof path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// Binary Merkle tree over subject leaf digests.
///
/// Built bottom-up. Odd node counts at any level are padded by duplicating
/// the last node (hashing it with itself); proof generation assumes the same
/// rule, so proofs and trees are interchangeable only within one build.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    root: ChainDigest,
    /// All tree nodes, stored level by level. Level 0 = leaves, last = root.
    levels: Vec<Vec<ChainDigest>>,
}

impl MerkleTree {
    /// Build a tree from leaf digests.
    ///
    /// Returns `None` for an empty leaf set: there is no meaningful root
    /// over nothing, and callers must not seal one.
    pub fn from_leaves(leaves: Vec<ChainDigest>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }

        let mut levels: Vec<Vec<ChainDigest>> = vec![leaves.clone()];
        let mut current = leaves;

        while current.len() > 1 {
            let mut next = Vec::with_capacity((current.len() + 1) / 2);
            for pair in current.chunks(2) {
                let node = if pair.len() == 2 {
                    hash_pair(&pair[0], &pair[1])
                } else {
                    // Odd node: duplicate-last padding
                    hash_pair(&pair[0], &pair[0])
                };
                next.push(node);
            }
            levels.push(next.clone());
            current = next;
        }

        Some(Self {
            root: current[0],
            levels,
        })
    }

    /// The root digest of the tree.
    pub fn root(&self) -> ChainDigest {
        self.root
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Option<MerkleProof> {
        if index >= self.leaf_count() {
            return None;
        }

        let mut path = Vec::new();
        let mut idx = index;

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_idx = if idx % 2 == 0 { idx + 1 } else { idx - 1 };
            let sibling = if sibling_idx < level.len() {
                level[sibling_idx]
            } else {
                // Duplicate-last padding: the node is its own sibling
                level[idx]
            };
            let side = if idx % 2 == 0 { Side::Right } else { Side::Left };
            path.push((sibling, side));
            idx /= 2;
        }

        Some(MerkleProof { path })
    }
}

/// Sibling path from a leaf to the root.
///
/// Proofs are recomputed on every rebuild; a proof is only meaningful
/// against the root sealed by the same rebuild.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// `(sibling_digest, sibling_side)` pairs from leaf to root.
    pub path: Vec<(ChainDigest, Side)>,
}

impl MerkleProof {
    /// Recompute the root from `leaf` along the path and compare to `root`.
    ///
    /// Returns `false` on any mismatch. An empty path only verifies when the
    /// leaf itself is the root (the single-leaf tree); against any larger
    /// tree's root it fails.
    pub fn verify_against(&self, leaf: &ChainDigest, root: &ChainDigest) -> bool {
        let mut current = *leaf;
        for (sibling, side) in &self.path {
            current = match side {
                Side::Left => hash_pair(sibling, &current),
                Side::Right => hash_pair(&current, sibling),
            };
        }
        current == *root
    }

    /// Number of path steps (tree height).
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

fn hash_pair(left: &ChainDigest, right: &ChainDigest) -> ChainDigest {
    let mut input = Vec::with_capacity(64);
    input.extend_from_slice(left.as_bytes());
    input.extend_from_slice(right.as_bytes());
    DomainHasher::NODE.hash(&input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leaf(seed: u8) -> ChainDigest {
        DomainHasher::LEAF.hash(&[seed])
    }

    #[test]
    fn empty_leaf_set_has_no_tree() {
        assert!(MerkleTree::from_leaves(vec![]).is_none());
    }

    #[test]
    fn single_leaf_is_root() {
        let l = leaf(1);
        let tree = MerkleTree::from_leaves(vec![l]).unwrap();
        assert_eq!(tree.root(), l);
        let proof = tree.proof(0).unwrap();
        assert!(proof.is_empty());
        assert!(proof.verify_against(&l, &tree.root()));
    }

    #[test]
    fn proof_verifies_for_all_leaves() {
        let leaves: Vec<ChainDigest> = (0..7).map(leaf).collect();
        let tree = MerkleTree::from_leaves(leaves.clone()).unwrap();

        for (i, l) in leaves.iter().enumerate() {
            let proof = tree.proof(i).expect("proof should exist");
            assert!(
                proof.verify_against(l, &tree.root()),
                "proof for leaf {i} should verify"
            );
        }
    }

    #[test]
    fn proof_out_of_bounds_returns_none() {
        let tree = MerkleTree::from_leaves(vec![leaf(1), leaf(2)]).unwrap();
        assert!(tree.proof(5).is_none());
    }

    #[test]
    fn tampered_leaf_fails_verification() {
        let tree = MerkleTree::from_leaves(vec![leaf(1), leaf(2), leaf(3), leaf(4)]).unwrap();
        let proof = tree.proof(0).unwrap();
        assert!(!proof.verify_against(&leaf(99), &tree.root()));
    }

    #[test]
    fn empty_proof_fails_against_multi_leaf_root() {
        let tree = MerkleTree::from_leaves(vec![leaf(1), leaf(2)]).unwrap();
        let empty = MerkleProof::default();
        assert!(!empty.verify_against(&leaf(1), &tree.root()));
    }

    #[test]
    fn wrong_root_fails_verification() {
        let tree1 = MerkleTree::from_leaves(vec![leaf(1), leaf(2)]).unwrap();
        let tree2 = MerkleTree::from_leaves(vec![leaf(3), leaf(4)]).unwrap();
        let proof = tree1.proof(0).unwrap();
        assert!(!proof.verify_against(&leaf(1), &tree2.root()));
    }

    #[test]
    fn deterministic_root() {
        let leaves: Vec<ChainDigest> = (0..10).map(leaf).collect();
        let tree1 = MerkleTree::from_leaves(leaves.clone()).unwrap();
        let tree2 = MerkleTree::from_leaves(leaves).unwrap();
        assert_eq!(tree1.root(), tree2.root());
    }

    #[test]
    fn power_of_two_leaves_have_log_depth() {
        let leaves: Vec<ChainDigest> = (0..8).map(leaf).collect();
        let tree = MerkleTree::from_leaves(leaves.clone()).unwrap();
        for (i, l) in leaves.iter().enumerate() {
            let proof = tree.proof(i).unwrap();
            assert_eq!(proof.len(), 3); // log2(8) = 3
            assert!(proof.verify_against(l, &tree.root()));
        }
    }

    #[test]
    fn proof_serde_roundtrip() {
        let tree = MerkleTree::from_leaves(vec![leaf(1), leaf(2), leaf(3)]).unwrap();
        let proof = tree.proof(2).unwrap();
        let json = serde_json::to_string(&proof).unwrap();
        let parsed: MerkleProof = serde_json::from_str(&json).unwrap();
        assert_eq!(proof, parsed);
    }

    proptest! {
        #[test]
        fn round_trip_over_arbitrary_leaf_counts(count in 1usize..40) {
            let leaves: Vec<ChainDigest> =
                (0..count).map(|i| leaf(i as u8)).collect();
            let tree = MerkleTree::from_leaves(leaves.clone()).unwrap();
            for (i, l) in leaves.iter().enumerate() {
                let proof = tree.proof(i).unwrap();
                prop_assert!(proof.verify_against(l, &tree.root()));
            }
        }
    }
}
