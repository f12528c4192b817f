//! Cryptographic primitives for Custos.
//!
//! Provides domain-separated BLAKE3 hashing, Ed25519 signing/verification
//! behind a keyring boundary, chain-link computation, and binary Merkle
//! trees with inclusion proofs.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;
pub mod keyring;
pub mod link;
pub mod merkle;
pub mod signer;

pub use hasher::DomainHasher;
pub use keyring::{InMemoryKeyring, Keyring, KeyringError};
pub use link::compute_link;
pub use merkle::{MerkleProof, MerkleTree, Side};
pub use signer::{CryptoError, Signature, SigningKey, VerifyingKey};
