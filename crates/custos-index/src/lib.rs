//! Merkle tree index over the Custos evidence set.
//!
//! Every mutation of the evidence set triggers a full rebuild: a new root is
//! sealed onto the root chain and every subject's inclusion proof is
//! recomputed. Proofs from before a rebuild must never be trusted against
//! the root sealed after it, which is why the index hands out root and proof
//! as one atomic snapshot.

pub mod error;
pub mod index;
pub mod leaf;

pub use error::IndexError;
pub use index::{MerkleIndex, RebuildOutcome, SealedRoot};
pub use leaf::LeafSubject;
