//! Record storage boundary for Custos.
//!
//! Custody records live behind `Send + Sync` trait boundaries so the
//! composition layer never depends on a concrete backend. The in-memory
//! implementations serve tests and embedding; a database-backed store plugs
//! in at the same traits.
//!
//! Ownership split: the ledger subsystem owns the cryptographic fields of a
//! record (its [`ProvenanceSeal`](custos_ledger::ProvenanceSeal) and Merkle
//! proof); the store owns the descriptive fields and display numbering.

pub mod access;
pub mod audit;
pub mod error;
pub mod evidence;
pub mod memory;
pub mod movement;
pub mod traits;

pub use access::{AccessPurpose, AccessRecord, AccessStatus};
pub use audit::{AuditAction, AuditEvent, AuditQuery};
pub use error::StoreError;
pub use evidence::{Attachment, EvidenceKind, EvidenceRecord, EvidenceStatus};
pub use memory::{
    InMemoryAccessStore, InMemoryAuditLog, InMemoryEvidenceStore, InMemoryMovementStore,
};
pub use movement::{MovementRecord, MovementStatus};
pub use traits::{AccessStore, AuditSink, EvidenceStore, MovementStore};
