//! Foundation types for Custos.
//!
//! This crate provides the identifier, digest, and temporal types shared by
//! every other Custos crate.
//!
//! # Key Types
//!
//! - [`ChainDigest`] — 32-byte BLAKE3 digest used for chain links, Merkle
//!   leaves, and roots
//! - [`StreamId`] — the closed set of independent ledger streams
//! - [`PrincipalId`] / [`EvidenceId`] / [`SubjectId`] — record identities
//!   (UUID v7 for time-ordering)
//! - [`CaseNo`] — human-assigned case number
//! - [`UnixMillis`] — integer wall-clock timestamp, persisted verbatim for
//!   signing and later re-verification

pub mod digest;
pub mod error;
pub mod id;
pub mod temporal;

pub use digest::{ChainDigest, GENESIS};
pub use error::TypeError;
pub use id::{AccessId, CaseNo, EvidenceId, MovementId, PrincipalId, StreamId, SubjectId};
pub use temporal::UnixMillis;
